use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::GameSummary;

pub const SCHEMA_VERSION: u32 = 1;

/// Oldest games fall off the saved history past this many.
pub const MAX_SCORE_HISTORY: usize = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    pub highest_score: u64,
    pub games_played: u32,
    /// Sum of per-game accuracy percentages; the average is derived.
    pub accuracy_sum: u64,
    pub login_streak: u32,
    pub last_login: Option<NaiveDate>,
    pub first_login: Option<NaiveDate>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            user_id: new_user_id(&mut rand::thread_rng()),
            username: String::new(),
            bio: String::new(),
            highest_score: 0,
            games_played: 0,
            accuracy_sum: 0,
            login_streak: 0,
            last_login: None,
            first_login: None,
        }
    }
}

fn new_user_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:016x}", rng.gen_range(0..=u64::MAX))
}

impl ProfileData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Counts consecutive days played. A second login on the same day keeps
    /// the streak; a gap of more than one day starts over.
    pub fn register_login(&mut self, today: NaiveDate) {
        self.login_streak = match self.last_login {
            Some(last) if last == today => self.login_streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.login_streak + 1,
            _ => 1,
        };
        self.last_login = Some(today);
        if self.first_login.is_none() {
            self.first_login = Some(today);
        }
    }

    pub fn record_game(&mut self, summary: &GameSummary) {
        self.games_played += 1;
        self.highest_score = self.highest_score.max(summary.score);
        self.accuracy_sum += summary.accuracy as u64;
    }

    pub fn average_accuracy(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        (self.accuracy_sum as f64 / self.games_played as f64).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    pub accuracy: u32,
    pub level: u32,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn from_summary(name: &str, summary: &GameSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            score: summary.score,
            accuracy: summary.accuracy,
            level: summary.level,
            round: summary.round,
            timestamp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub schema_version: u32,
    pub scores: Vec<ScoreRecord>,
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scores: Vec::new(),
        }
    }
}

impl ScoreHistory {
    pub fn push(&mut self, record: ScoreRecord) {
        self.scores.push(record);
        if self.scores.len() > MAX_SCORE_HISTORY {
            let excess = self.scores.len() - MAX_SCORE_HISTORY;
            self.scores.drain(..excess);
        }
    }

    /// Best `n` scores, highest first; equal scores keep the older one first.
    pub fn top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut sorted = self.scores.clone();
        sorted.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
        sorted.truncate(n);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_login_streak_rules() {
        let mut p = ProfileData::default();
        p.register_login(day(1));
        assert_eq!(p.login_streak, 1);
        p.register_login(day(1));
        assert_eq!(p.login_streak, 1);
        p.register_login(day(2));
        p.register_login(day(3));
        assert_eq!(p.login_streak, 3);
        p.register_login(day(6));
        assert_eq!(p.login_streak, 1);
        assert_eq!(p.first_login, Some(day(1)));
        assert_eq!(p.last_login, Some(day(6)));
    }

    #[test]
    fn test_record_game_tracks_best_and_average() {
        let mut p = ProfileData::default();
        let game = |score, accuracy| GameSummary {
            score,
            accuracy,
            level: 1,
            round: 1,
        };
        p.record_game(&game(120, 90));
        p.record_game(&game(80, 71));
        assert_eq!(p.highest_score, 120);
        assert_eq!(p.games_played, 2);
        assert_eq!(p.average_accuracy(), 81);
    }

    #[test]
    fn test_user_ids_are_hex() {
        let p = ProfileData::default();
        assert_eq!(p.user_id.len(), 16);
        assert!(p.user_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_top_orders_by_score_then_age() {
        let at = |s| Utc.timestamp_opt(s, 0).unwrap();
        let rec = |name: &str, score, ts| ScoreRecord {
            name: name.to_string(),
            score,
            accuracy: 100,
            level: 1,
            round: 1,
            timestamp: at(ts),
        };
        let mut h = ScoreHistory::default();
        h.push(rec("late", 50, 30));
        h.push(rec("best", 90, 20));
        h.push(rec("early", 50, 10));
        let names: Vec<String> = h.top(2).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["best", "early"]);
    }

    #[test]
    fn test_history_drops_oldest_past_cap() {
        let mut h = ScoreHistory::default();
        for i in 0..(MAX_SCORE_HISTORY as i64 + 3) {
            h.push(ScoreRecord {
                name: format!("game{i}"),
                score: i as u64,
                accuracy: 100,
                level: 1,
                round: 1,
                timestamp: Utc.timestamp_opt(i, 0).unwrap(),
            });
        }
        assert_eq!(h.scores.len(), MAX_SCORE_HISTORY);
        assert_eq!(h.scores[0].name, "game3");
        assert_eq!(h.top(1)[0].score, MAX_SCORE_HISTORY as u64 + 2);
    }
}
