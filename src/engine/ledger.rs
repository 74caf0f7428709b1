/// Score, typing accuracy and remaining lives for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub score: u64,
    pub misses: u32,
    pub total_typed: u32,
    pub correct_typed: u32,
    pub streak: u32,
}

impl Ledger {
    /// Whole-percent accuracy over every non-empty submission.
    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct_typed, self.total_typed)
    }

    pub fn record_attempt(&mut self) {
        self.total_typed += 1;
    }

    pub fn record_correct(&mut self) -> u32 {
        self.correct_typed += 1;
        self.streak += 1;
        self.streak
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }

    /// A word reached the floor. Returns the new miss count.
    pub fn record_miss(&mut self, max_misses: u32) -> u32 {
        self.misses = (self.misses + 1).min(max_misses);
        self.streak = 0;
        self.misses
    }

    pub fn heal(&mut self) {
        self.misses = self.misses.saturating_sub(1);
    }

    pub fn reset_misses(&mut self) {
        self.misses = 0;
    }

    pub fn add_points(&mut self, points: u64) -> (u64, u64) {
        let before = self.score;
        self.score += points;
        (before, self.score)
    }
}

pub fn accuracy(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Points for clearing one word.
pub fn hit_points(base: u64, level: u32, round: u32) -> u64 {
    base * level as u64 * round as u64
}

/// A hit levels up only when it leaves the score on an exact multiple of `step`.
pub fn lands_on_level_up(score: u64, step: u64) -> bool {
    step != 0 && score != 0 && score % step == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_zero_without_attempts() {
        assert_eq!(Ledger::default().accuracy(), 0);
    }

    #[test]
    fn test_accuracy_rounds_to_whole_percent() {
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(5, 5), 100);
    }

    #[test]
    fn test_miss_clamps_and_breaks_streak() {
        let mut ledger = Ledger {
            streak: 4,
            ..Default::default()
        };
        for _ in 0..5 {
            ledger.record_miss(3);
        }
        assert_eq!(ledger.misses, 3);
        assert_eq!(ledger.streak, 0);
    }

    #[test]
    fn test_heal_floors_at_zero() {
        let mut ledger = Ledger {
            misses: 2,
            ..Default::default()
        };
        ledger.heal();
        assert_eq!(ledger.misses, 1);
        ledger.heal();
        ledger.heal();
        assert_eq!(ledger.misses, 0);
    }

    #[test]
    fn test_hit_points_scale_with_level_and_round() {
        assert_eq!(hit_points(10, 1, 1), 10);
        assert_eq!(hit_points(10, 3, 2), 60);
    }

    #[test]
    fn test_level_up_needs_exact_multiple() {
        let mut ledger = Ledger::default();
        ledger.score = 60;
        let (_, after) = ledger.add_points(40);
        assert!(lands_on_level_up(after, 100));

        ledger.score = 180;
        let (_, after) = ledger.add_points(40);
        assert_eq!(after, 220);
        assert!(!lands_on_level_up(after, 100));

        assert!(!lands_on_level_up(0, 100));
        assert!(!lands_on_level_up(100, 0));
    }
}
