#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub u64);

/// A word on the board, falling from the top edge to the floor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveWord {
    pub id: WordId,
    pub text: String,
    /// Seconds of unscaled game time needed to reach the floor.
    pub duration: f64,
    pub x: u16,
    pub elapsed: f64,
    /// Hit by the skip power; held in place until it is removed.
    pub slashed: bool,
}

impl ActiveWord {
    pub fn new(id: WordId, text: String, duration: f64, x: u16) -> Self {
        Self {
            id,
            text,
            duration,
            x,
            elapsed: 0.0,
            slashed: false,
        }
    }

    /// Fraction of the fall completed, 0.0 at the top and 1.0 at the floor.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn landed(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Moves the word by `dt_secs` scaled by `time_scale`. Returns true when
    /// this step carried it onto the floor.
    pub fn advance(&mut self, dt_secs: f64, time_scale: f64) -> bool {
        if self.slashed || self.landed() || time_scale <= 0.0 {
            return false;
        }
        self.elapsed += dt_secs * time_scale;
        self.landed()
    }

    /// Unscaled milliseconds until landing at the given time scale.
    pub fn ms_to_floor(&self, time_scale: f64) -> Option<u64> {
        if self.slashed || time_scale <= 0.0 {
            return None;
        }
        Some((self.remaining_secs() / time_scale * 1000.0).ceil() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(duration: f64) -> ActiveWord {
        ActiveWord::new(WordId(1), "neon".to_string(), duration, 4)
    }

    #[test]
    fn test_advance_reaches_floor() {
        let mut w = word(2.0);
        assert!(!w.advance(1.0, 1.0));
        assert!((w.progress() - 0.5).abs() < 1e-9);
        assert!(w.advance(1.0, 1.0));
        assert_eq!(w.progress(), 1.0);
        // Landing is reported once.
        assert!(!w.advance(1.0, 1.0));
    }

    #[test]
    fn test_time_scale_slows_and_freezes() {
        let mut w = word(3.0);
        w.advance(1.0, 0.3);
        assert!((w.elapsed - 0.3).abs() < 1e-9);
        w.advance(5.0, 0.0);
        assert!((w.elapsed - 0.3).abs() < 1e-9);
        assert_eq!(w.ms_to_floor(0.0), None);
    }

    #[test]
    fn test_slashed_word_holds_position() {
        let mut w = word(1.0);
        w.slashed = true;
        assert!(!w.advance(10.0, 1.0));
        assert_eq!(w.elapsed, 0.0);
    }

    #[test]
    fn test_ms_to_floor_accounts_for_scale() {
        let w = word(1.5);
        assert_eq!(w.ms_to_floor(1.0), Some(1500));
        assert_eq!(w.ms_to_floor(0.5), Some(3000));
    }
}
