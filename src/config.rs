use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::{Tuning, UnlockPolicy};

/// Widest margin kept clear on each side of a spawned word.
const MAX_SPAWN_PADDING: u16 = 8;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_player_name")]
    pub player_name: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_network_enabled")]
    pub network_enabled: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub power_unlock_policy: UnlockPolicy,
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_player_name() -> String {
    "Anonymous".to_string()
}
fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_network_enabled() -> bool {
    true
}
fn default_theme() -> String {
    "neon".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            api_base_url: default_api_base_url(),
            network_enabled: default_network_enabled(),
            theme: default_theme(),
            power_unlock_policy: UnlockPolicy::default(),
            tuning: Tuning::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typesprint")
            .join("config.toml")
    }

    /// Repairs values a hand-edited file can get wrong.
    pub fn normalize(&mut self) {
        if self.player_name.trim().is_empty() {
            self.player_name = default_player_name();
        }
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = default_api_base_url();
        }
        let t = &mut self.tuning;
        t.rounds = t.rounds.max(1);
        t.round_secs = t.round_secs.max(1);
        t.max_misses = t.max_misses.max(1);
        // The board holds a single falling word.
        t.max_active_words = 1;
        t.spawn_padding = t.spawn_padding.min(MAX_SPAWN_PADDING);
        t.level_threshold = t.level_threshold.max(1);
        if t.round_speed_factors.is_empty() {
            t.round_speed_factors = Tuning::default().round_speed_factors;
        }
    }
}
