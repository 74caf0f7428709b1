pub mod board;
pub mod game_over;
pub mod hud;
pub mod leaderboard;
pub mod menu;
pub mod profile;
pub mod progress_bar;

use rust_i18n::t;

use crate::engine::Notice;

/// Banner text for a transient notice.
pub fn notice_text(notice: Notice) -> String {
    match notice {
        Notice::OnFire { streak } => t!("notice.on_fire", streak = streak).to_string(),
        Notice::Wrong => t!("notice.wrong").to_string(),
        Notice::TooSlow => t!("notice.too_slow").to_string(),
        Notice::LevelUp { level } => t!("notice.level_up", level = level).to_string(),
        Notice::PowerUnlocked(power) => {
            let name = format!("{} {}", power.icon(), power.label());
            t!("notice.power_unlocked", power = name).to_string()
        }
        Notice::Healed => t!("notice.healed").to_string(),
        Notice::Slashed => t!("notice.slashed").to_string(),
    }
}

/// Screens with a footer of key hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintSet {
    Menu,
    Game,
    Paused,
    Leaderboard,
}

/// Localized key hints for a screen footer, one entry per key.
pub fn hints(set: HintSet) -> Vec<String> {
    let joined = match set {
        HintSet::Menu => t!("menu.hints"),
        HintSet::Game => t!("game.hints"),
        HintSet::Paused => t!("game.paused_hint"),
        HintSet::Leaderboard => t!("leaderboard.hints"),
    };
    joined.split('|').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PowerUp;

    #[test]
    fn test_notice_text_interpolates() {
        assert_eq!(notice_text(Notice::OnFire { streak: 6 }), "ON FIRE x6");
        assert_eq!(notice_text(Notice::Healed), "+1 HP");
        assert!(notice_text(Notice::PowerUnlocked(PowerUp::Freeze)).contains("Freeze"));
    }

    #[test]
    fn test_hints_split_per_key() {
        let game = hints(HintSet::Game);
        assert_eq!(game.len(), 3);
        assert_eq!(game[0], "[Enter] Submit");
    }
}
