use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use typesprint::engine::GameSummary;
use typesprint::store::json_store::JsonStore;
use typesprint::store::schema::{ScoreHistory, ScoreRecord};

fn summary(score: u64, accuracy: u32) -> GameSummary {
    GameSummary {
        score,
        accuracy,
        level: 2,
        round: 3,
    }
}

#[test]
fn profile_survives_restarts_across_days() {
    let dir = TempDir::new().unwrap();
    let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut profile = store.load_profile_or_reset();
    profile.username = "ada".to_string();
    profile.register_login(day(1));
    profile.record_game(&summary(120, 90));
    store.save_profile(&profile).unwrap();
    let id = profile.user_id.clone();

    // Fresh store handle, as after restarting the game the next day.
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut profile = store.load_profile().expect("saved profile");
    assert_eq!(profile.user_id, id);
    profile.register_login(day(2));
    profile.record_game(&summary(80, 70));
    store.save_profile(&profile).unwrap();

    let profile = store.load_profile().unwrap();
    assert_eq!(profile.username, "ada");
    assert_eq!(profile.login_streak, 2);
    assert_eq!(profile.games_played, 2);
    assert_eq!(profile.highest_score, 120);
    assert_eq!(profile.average_accuracy(), 80);
    assert_eq!(profile.first_login, Some(day(1)));
}

#[test]
fn score_history_reloads_in_rank_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();

    let mut history = ScoreHistory::default();
    for (i, score) in [40u64, 300, 120, 300].into_iter().enumerate() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, i as u32, 0).unwrap();
        history.push(ScoreRecord::from_summary("ada", &summary(score, 95), at));
    }
    store.save_scores(&history).unwrap();

    let loaded = store.load_scores();
    assert_eq!(loaded, history);
    let top: Vec<u64> = loaded.top(3).iter().map(|r| r.score).collect();
    assert_eq!(top, vec![300, 300, 120]);
    assert_eq!(loaded.top(3)[0].timestamp.format("%M").to_string(), "01");
}
