use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub board_bg: String,
    pub word: String,
    pub word_matched: String,
    pub word_wrong: String,
    pub word_wrong_bg: String,
    pub word_slashed: String,
    pub floor: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub heart: String,
    pub power: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in the config dir shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("typesprint")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path)
                && let Ok(theme) = toml::from_str::<Theme>(&content)
            {
                return Some(theme);
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("neon").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#0b0f1a".to_string(),
            fg: "#e6f1ff".to_string(),
            board_bg: "#101626".to_string(),
            word: "#e6f1ff".to_string(),
            word_matched: "#39ff14".to_string(),
            word_wrong: "#ff3864".to_string(),
            word_wrong_bg: "#3a1020".to_string(),
            word_slashed: "#6b7280".to_string(),
            floor: "#ff3864".to_string(),
            accent: "#00e5ff".to_string(),
            accent_dim: "#1f3b4d".to_string(),
            border: "#1f3b4d".to_string(),
            border_focused: "#00e5ff".to_string(),
            header_bg: "#141b2d".to_string(),
            header_fg: "#e6f1ff".to_string(),
            bar_filled: "#00e5ff".to_string(),
            bar_empty: "#1f2937".to_string(),
            heart: "#ff3864".to_string(),
            power: "#f9e24f".to_string(),
            error: "#ff3864".to_string(),
            warning: "#f9e24f".to_string(),
            success: "#39ff14".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn board_bg(&self) -> Color { Self::parse_color(&self.board_bg) }
    pub fn word(&self) -> Color { Self::parse_color(&self.word) }
    pub fn word_matched(&self) -> Color { Self::parse_color(&self.word_matched) }
    pub fn word_wrong(&self) -> Color { Self::parse_color(&self.word_wrong) }
    pub fn word_wrong_bg(&self) -> Color { Self::parse_color(&self.word_wrong_bg) }
    pub fn word_slashed(&self) -> Color { Self::parse_color(&self.word_slashed) }
    pub fn floor(&self) -> Color { Self::parse_color(&self.floor) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn heart(&self) -> Color { Self::parse_color(&self.heart) }
    pub fn power(&self) -> Color { Self::parse_color(&self.power) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"neon".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }
}
