use tracing::info;

use crate::engine::session::{GameEvent, GameSession, Timers};

/// Where the session is in its round structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Countdown before `round` starts.
    Intermission { round: u32, remaining: u32 },
    Active { round: u32 },
    Ended { round: u32 },
}

impl Phase {
    pub fn round(self) -> u32 {
        match self {
            Phase::Intermission { round, .. } | Phase::Active { round } | Phase::Ended { round } => {
                round
            }
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Phase::Active { .. })
    }

    pub fn is_intermission(self) -> bool {
        matches!(self, Phase::Intermission { .. })
    }

    pub fn is_over(self) -> bool {
        matches!(self, Phase::Ended { .. })
    }
}

impl GameSession {
    pub(crate) fn begin_round(&mut self, round: u32) {
        self.phase = Phase::Active { round };
        self.timer = self.tuning.round_secs;
        self.ledger.reset_misses();
        self.active.clear();
        self.pending_fetch = None;
        self.cooldown = false;
        let stale = self.timers.cooldown.take();
        self.cancel_timer(stale);
        self.checkpoints.reset();
        info!(round, level = self.level, "round started");
        self.events.push(GameEvent::RoundStarted { round });
        self.start_spawn_interval();
        self.try_spawn();
    }

    /// Closes a round whose clock ran out, then either counts down to the
    /// next one or ends the game after the last.
    pub(crate) fn finish_round(&mut self, round: u32) {
        for stale in [
            self.timers.spawn.take(),
            self.timers.cooldown.take(),
            self.timers.slow.take(),
            self.timers.freeze.take(),
            self.timers.skip.take(),
        ] {
            self.cancel_timer(stale);
        }
        self.effects.clear();
        self.current_power = None;
        self.active.clear();
        self.pending_fetch = None;
        self.requests.clear();
        self.cooldown = false;
        info!(round, score = self.ledger.score, "round cleared");
        self.events.push(GameEvent::RoundCleared { round });

        if round < self.tuning.rounds {
            self.checkpoints.reset();
            self.phase = Phase::Intermission {
                round: round + 1,
                remaining: self.tuning.intermission_secs,
            };
        } else {
            self.end_game();
        }
    }

    /// Stops everything and reports the final numbers. Safe to call more
    /// than once; only the first call has any effect.
    pub(crate) fn end_game(&mut self) {
        if self.game_over_sent {
            return;
        }
        self.game_over_sent = true;
        self.phase = Phase::Ended {
            round: self.phase.round(),
        };
        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.effects.clear();
        self.active.clear();
        self.pending_fetch = None;
        self.requests.clear();
        self.cooldown = false;
        self.notice = None;
        self.input.clear();
        let summary = self.summary();
        info!(
            score = summary.score,
            accuracy = summary.accuracy,
            level = summary.level,
            round = summary.round,
            "game over"
        );
        self.events.push(GameEvent::GameOver(summary));
    }
}
