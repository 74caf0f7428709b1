use crate::engine::progression::Phase;
use crate::engine::session::GameSession;

impl GameSession {
    /// One-second heartbeat. Drives the intermission countdown, the round
    /// clock, and the power unlock checkpoints.
    pub(crate) fn on_tick(&mut self) {
        if self.paused {
            return;
        }
        match self.phase {
            Phase::Intermission { round, remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.begin_round(round);
                } else {
                    self.phase = Phase::Intermission { round, remaining };
                }
            }
            Phase::Active { round } => {
                self.timer = self.timer.saturating_sub(1);
                let due: Vec<usize> = self
                    .tuning
                    .power_checkpoints()
                    .filter(|&(_, at)| at == self.timer)
                    .map(|(idx, _)| idx)
                    .collect();
                for idx in due {
                    if self.checkpoints.fire(idx) {
                        self.unlock_power();
                    }
                }
                if self.timer == 0 {
                    self.finish_round(round);
                }
            }
            Phase::Ended { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::engine::session::{GameEvent, GameSession, SessionSettings};

    fn started() -> GameSession {
        let mut s = GameSession::new(SessionSettings::default(), SmallRng::seed_from_u64(21));
        s.advance(Duration::from_secs(5));
        s
    }

    fn unlocks(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUnlocked(_)))
            .count()
    }

    #[test]
    fn test_round_clock_counts_down() {
        let mut s = started();
        s.advance(Duration::from_millis(2500));
        assert_eq!(s.timer(), 58);
    }

    #[test]
    fn test_paused_clock_holds() {
        let mut s = started();
        s.pause();
        s.advance(Duration::from_secs(30));
        assert_eq!(s.timer(), 60);
        s.resume();
        s.advance(Duration::from_secs(1));
        assert_eq!(s.timer(), 59);
    }

    #[test]
    fn test_powers_unlock_at_twenty_and_forty_seconds() {
        let mut s = started();
        s.drain_events();
        s.advance(Duration::from_secs(19));
        assert_eq!(unlocks(&s.drain_events()), 0);
        s.advance(Duration::from_secs(1));
        assert_eq!(unlocks(&s.drain_events()), 1);
        assert!(s.current_power().is_some());
        s.advance(Duration::from_secs(20));
        assert_eq!(unlocks(&s.drain_events()), 1);
        s.advance(Duration::from_secs(19));
        assert_eq!(unlocks(&s.drain_events()), 0);
    }
}
