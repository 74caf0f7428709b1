use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::store::schema::{ProfileData, SCHEMA_VERSION, ScoreHistory};

const PROFILE_FILE: &str = "profile.json";
const SCORES_FILE: &str = "scores.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files yield the default value.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = name, error = %e, "discarding unreadable save file");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Returns None when the file exists but cannot be parsed.
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            Some(ProfileData::default())
        }
    }

    /// Loads the profile, starting over when it is corrupt or from an older
    /// schema.
    pub fn load_profile_or_reset(&self) -> ProfileData {
        match self.load_profile() {
            Some(profile) if !profile.needs_reset() => profile,
            Some(_) | None => {
                warn!("profile unreadable or outdated, starting fresh");
                ProfileData::default()
            }
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    pub fn load_scores(&self) -> ScoreHistory {
        let history: ScoreHistory = self.load(SCORES_FILE);
        if history.schema_version != SCHEMA_VERSION {
            warn!(found = history.schema_version, "score history version mismatch, ignoring");
            return ScoreHistory::default();
        }
        history
    }

    pub fn save_scores(&self, data: &ScoreHistory) -> Result<()> {
        if data.schema_version != SCHEMA_VERSION {
            bail!(
                "Unsupported score history version: {} (expected {})",
                data.schema_version,
                SCHEMA_VERSION
            );
        }
        self.save(SCORES_FILE, data)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typesprint")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::engine::GameSummary;
    use crate::store::schema::ScoreRecord;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let (_dir, store) = make_test_store();
        assert!(store.load_profile().is_some());
        assert!(store.load_scores().scores.is_empty());
    }

    #[test]
    fn test_corrupt_profile_is_reported_then_reset() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROFILE_FILE), "{not json").unwrap();
        assert!(store.load_profile().is_none());
        let fresh = store.load_profile_or_reset();
        assert_eq!(fresh.games_played, 0);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        let mut history = ScoreHistory::default();
        let summary = GameSummary {
            score: 40,
            accuracy: 80,
            level: 1,
            round: 2,
        };
        history.push(ScoreRecord::from_summary("ada", &summary, Utc::now()));
        store.save_scores(&history).unwrap();

        assert_eq!(store.load_scores(), history);
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn test_refuses_to_save_foreign_version() {
        let (_dir, store) = make_test_store();
        let history = ScoreHistory {
            schema_version: 99,
            scores: Vec::new(),
        };
        let err = store.save_scores(&history).unwrap_err().to_string();
        assert!(err.contains("99"));
    }
}
