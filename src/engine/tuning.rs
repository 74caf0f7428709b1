use serde::{Deserialize, Serialize};

/// Game-balance knobs. Defaults reproduce the arcade rules: three 60 second
/// rounds, three lives, words speeding up with level and round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rounds: u32,
    pub round_secs: u32,
    pub intermission_secs: u32,
    pub max_misses: u32,
    pub max_active_words: usize,
    pub round_speed_factors: Vec<f64>,
    pub base_fall_secs: f64,
    pub fall_step_secs: f64,
    pub min_fall_secs: f64,
    pub fall_jitter_secs: f64,
    pub min_duration_secs: f64,
    pub density_base_ms: u64,
    pub density_step_ms: u64,
    pub density_floor_ms: u64,
    pub miss_cooldown_floor_ms: u64,
    pub power_checkpoints_secs: Vec<u32>,
    pub slow_ms: u64,
    pub slow_time_scale: f64,
    pub freeze_ms: u64,
    pub skip_hold_ms: u64,
    pub points_per_hit: u64,
    pub level_threshold: u64,
    pub on_fire_streak: u32,
    pub spawn_padding: u16,
    pub notice_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_secs: 60,
            intermission_secs: 5,
            max_misses: 3,
            max_active_words: 1,
            round_speed_factors: vec![1.0, 0.8, 0.65],
            base_fall_secs: 3.6,
            fall_step_secs: 0.08,
            min_fall_secs: 1.8,
            fall_jitter_secs: 1.2,
            min_duration_secs: 0.8,
            density_base_ms: 2200,
            density_step_ms: 120,
            density_floor_ms: 900,
            miss_cooldown_floor_ms: 900,
            power_checkpoints_secs: vec![20, 40],
            slow_ms: 5000,
            slow_time_scale: 0.3,
            freeze_ms: 3000,
            skip_hold_ms: 800,
            points_per_hit: 10,
            level_threshold: 100,
            on_fire_streak: 5,
            spawn_padding: 2,
            notice_ms: 1200,
        }
    }
}

impl Tuning {
    /// Base fall time for a level, before jitter and the round factor.
    pub fn speed_by_level(&self, level: u32) -> f64 {
        (self.base_fall_secs - level as f64 * self.fall_step_secs).max(self.min_fall_secs)
    }

    /// Spawn interval for a level.
    pub fn density_ms(&self, level: u32) -> u64 {
        self.density_base_ms
            .saturating_sub(level as u64 * self.density_step_ms)
            .max(self.density_floor_ms)
    }

    pub fn miss_cooldown_ms(&self, level: u32) -> u64 {
        (self.density_ms(level) / 2).max(self.miss_cooldown_floor_ms)
    }

    /// Falls as the rounds go on; rounds past the table reuse its last entry.
    pub fn round_speed_factor(&self, round: u32) -> f64 {
        let idx = round.saturating_sub(1) as usize;
        self.round_speed_factors
            .get(idx)
            .or(self.round_speed_factors.last())
            .copied()
            .unwrap_or(1.0)
    }

    /// Fall duration given a jitter sample in `[0, fall_jitter_secs)`.
    /// The round factor scales the jitter only.
    pub fn fall_duration(&self, level: u32, round: u32, jitter: f64) -> f64 {
        (self.speed_by_level(level) + jitter * self.round_speed_factor(round))
            .max(self.min_duration_secs)
    }

    /// Remaining-time values of the round clock at which a power unlocks,
    /// paired with the checkpoint index.
    pub fn power_checkpoints(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.power_checkpoints_secs
            .iter()
            .enumerate()
            .filter_map(|(i, &elapsed)| self.round_secs.checked_sub(elapsed).map(|t| (i, t)))
    }
}
