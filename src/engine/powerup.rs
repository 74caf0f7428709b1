use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::fall::WordId;
use crate::engine::scheduler::Clock;
use crate::engine::session::{Effect, GameEvent, GameSession, Notice, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUp {
    Slow,
    Freeze,
    Skip,
    Heal,
}

pub const CATALOG: [PowerUp; 4] = [PowerUp::Slow, PowerUp::Freeze, PowerUp::Skip, PowerUp::Heal];

impl PowerUp {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        CATALOG[rng.gen_range(0..CATALOG.len())]
    }

    pub fn key(self) -> &'static str {
        match self {
            PowerUp::Slow => "slow",
            PowerUp::Freeze => "freeze",
            PowerUp::Skip => "skip",
            PowerUp::Heal => "heal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUp::Slow => "Slow Motion",
            PowerUp::Freeze => "Freeze",
            PowerUp::Skip => "Slash",
            PowerUp::Heal => "Heal",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PowerUp::Slow => "\u{1f40c}",
            PowerUp::Freeze => "\u{2744}",
            PowerUp::Skip => "\u{2694}",
            PowerUp::Heal => "\u{2764}",
        }
    }
}

/// What happens when a power unlocks while another one is still pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnlockPolicy {
    /// The newer power silently replaces the pending one.
    #[default]
    Replace,
    /// The pending power is kept and the new unlock is dropped.
    KeepPending,
}

impl UnlockPolicy {
    pub fn offer(self, slot: &mut Option<PowerUp>, unlocked: PowerUp) -> bool {
        match (self, slot.is_some()) {
            (UnlockPolicy::KeepPending, true) => false,
            _ => {
                *slot = Some(unlocked);
                true
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectState {
    pub slowed: bool,
    pub frozen: bool,
}

impl EffectState {
    /// Multiplier applied to fall progress.
    pub fn time_scale(&self, slow_scale: f64) -> f64 {
        if self.frozen {
            0.0
        } else if self.slowed {
            slow_scale
        } else {
            1.0
        }
    }

    pub fn clear(&mut self) {
        self.slowed = false;
        self.frozen = false;
    }
}

/// Per-round record of which unlock checkpoints already fired.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Checkpoints {
    fired: Vec<bool>,
}

impl Checkpoints {
    pub fn reset(&mut self) {
        self.fired.clear();
    }

    pub fn has_fired(&self, idx: usize) -> bool {
        self.fired.get(idx).copied().unwrap_or(false)
    }

    /// Marks a checkpoint; returns false when it had already fired.
    pub fn fire(&mut self, idx: usize) -> bool {
        if self.has_fired(idx) {
            return false;
        }
        if self.fired.len() <= idx {
            self.fired.resize(idx + 1, false);
        }
        self.fired[idx] = true;
        true
    }
}

impl GameSession {
    pub(crate) fn unlock_power(&mut self) {
        let power = PowerUp::random(&mut self.rng);
        if !self.unlock_policy.offer(&mut self.current_power, power) {
            debug!(power = power.key(), "unlock dropped, power already pending");
            return;
        }
        info!(power = power.key(), "power unlocked");
        self.events.push(GameEvent::PowerUnlocked(power));
        self.show_notice(Notice::PowerUnlocked(power));
    }

    /// Spends the pending power. Returns what was activated, if anything.
    pub fn activate_power(&mut self) -> Option<PowerUp> {
        if self.paused || self.exited || !self.phase.is_active() {
            return None;
        }
        let power = self.current_power.take()?;
        match power {
            PowerUp::Slow => {
                self.effects.slowed = true;
                let stale = self.timers.slow.take();
                self.cancel_timer(stale);
                let id = self.scheduler.schedule_once(
                    Clock::Wall,
                    self.tuning.slow_ms,
                    Task::EffectOver(Effect::Slow),
                );
                self.timers.slow = Some(id);
            }
            PowerUp::Freeze => {
                self.effects.frozen = true;
                let stale = self.timers.freeze.take();
                self.cancel_timer(stale);
                let id = self.scheduler.schedule_once(
                    Clock::Wall,
                    self.tuning.freeze_ms,
                    Task::EffectOver(Effect::Freeze),
                );
                self.timers.freeze = Some(id);
            }
            PowerUp::Skip => {
                if let Some(word) = self.active.iter_mut().find(|w| !w.slashed) {
                    word.slashed = true;
                    let target = word.id;
                    let id = self.scheduler.schedule_once(
                        Clock::Game,
                        self.tuning.skip_hold_ms,
                        Task::SkipResolve(target),
                    );
                    self.timers.skip = Some(id);
                    self.show_notice(Notice::Slashed);
                }
            }
            PowerUp::Heal => {
                self.ledger.heal();
                self.show_notice(Notice::Healed);
            }
        }
        info!(power = power.key(), "power activated");
        self.events.push(GameEvent::PowerActivated(power));
        Some(power)
    }

    pub(crate) fn on_effect_over(&mut self, effect: Effect) {
        match effect {
            Effect::Slow => {
                self.effects.slowed = false;
                self.timers.slow = None;
            }
            Effect::Freeze => {
                self.effects.frozen = false;
                self.timers.freeze = None;
            }
        }
    }

    /// A slashed word leaves the board and pays out like a hit, without
    /// counting as a typed word.
    pub(crate) fn on_skip_resolved(&mut self, id: WordId) {
        self.timers.skip = None;
        let Some(word) = self.remove_word(id) else {
            return;
        };
        let points = self.hit_value();
        self.events.push(GameEvent::Slashed {
            id,
            text: word.text,
            points,
        });
        self.award_points(points);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::session::SessionSettings;
    use crate::generator::WordEntry;

    #[test]
    fn test_random_covers_catalog() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(PowerUp::random(&mut rng));
        }
        assert_eq!(seen.len(), CATALOG.len());
    }

    #[test]
    fn test_replace_policy_overwrites() {
        let mut slot = Some(PowerUp::Slow);
        assert!(UnlockPolicy::Replace.offer(&mut slot, PowerUp::Heal));
        assert_eq!(slot, Some(PowerUp::Heal));
    }

    #[test]
    fn test_keep_pending_policy_ignores_new_unlock() {
        let mut slot = Some(PowerUp::Slow);
        assert!(!UnlockPolicy::KeepPending.offer(&mut slot, PowerUp::Heal));
        assert_eq!(slot, Some(PowerUp::Slow));

        let mut empty = None;
        assert!(UnlockPolicy::KeepPending.offer(&mut empty, PowerUp::Heal));
        assert_eq!(empty, Some(PowerUp::Heal));
    }

    #[test]
    fn test_time_scale_prefers_freeze() {
        let effects = EffectState {
            slowed: true,
            frozen: true,
        };
        assert_eq!(effects.time_scale(0.3), 0.0);
        let slowed = EffectState {
            slowed: true,
            frozen: false,
        };
        assert_eq!(slowed.time_scale(0.3), 0.3);
        assert_eq!(EffectState::default().time_scale(0.3), 1.0);
    }

    #[test]
    fn test_checkpoint_fires_once_until_reset() {
        let mut cps = Checkpoints::default();
        assert!(cps.fire(1));
        assert!(!cps.fire(1));
        assert!(!cps.has_fired(0));
        cps.reset();
        assert!(cps.fire(1));
    }

    fn started_with(power: PowerUp) -> GameSession {
        let mut s = GameSession::new(SessionSettings::default(), SmallRng::seed_from_u64(5));
        s.advance(Duration::from_secs(5));
        let req = s.take_spawn_requests().remove(0);
        s.complete_spawn(req.ticket, Ok(vec![WordEntry::new("neon")]));
        s.current_power = Some(power);
        s
    }

    #[test]
    fn test_freeze_stops_falls_for_three_seconds() {
        let mut s = started_with(PowerUp::Freeze);
        let before = s.active_words()[0].elapsed;
        assert_eq!(s.activate_power(), Some(PowerUp::Freeze));
        assert_eq!(s.current_power(), None);
        s.advance(Duration::from_millis(2900));
        assert_eq!(s.active_words()[0].elapsed, before);
        s.advance(Duration::from_millis(200));
        assert!(!s.effects().frozen);
        assert!(s.active_words()[0].elapsed > before);
    }

    #[test]
    fn test_slow_scales_fall_speed() {
        let mut s = started_with(PowerUp::Slow);
        s.activate_power();
        s.advance(Duration::from_millis(1000));
        assert!((s.active_words()[0].elapsed - 0.3).abs() < 1e-6);
        s.advance(Duration::from_millis(4000));
        assert!(!s.effects().slowed);
    }

    #[test]
    fn test_skip_awards_points_after_hold() {
        let mut s = started_with(PowerUp::Skip);
        s.activate_power();
        assert!(s.active_words()[0].slashed);
        s.advance(Duration::from_millis(799));
        assert_eq!(s.score(), 0);
        s.advance(Duration::from_millis(1));
        assert!(s.active_words().is_empty());
        assert_eq!(s.score(), 10);
        assert_eq!(s.correct_typed(), 0);
    }

    #[test]
    fn test_heal_restores_a_life() {
        let mut s = started_with(PowerUp::Heal);
        s.ledger.record_miss(3);
        s.activate_power();
        assert_eq!(s.misses(), 0);
        assert_eq!(s.activate_power(), None);
    }

    #[test]
    fn test_no_activation_while_paused() {
        let mut s = started_with(PowerUp::Heal);
        s.pause();
        assert_eq!(s.activate_power(), None);
        assert_eq!(s.current_power(), Some(PowerUp::Heal));
    }

    #[test]
    fn test_round_end_clears_effects_and_power() {
        let mut s = started_with(PowerUp::Slow);
        s.activate_power();
        s.current_power = Some(PowerUp::Heal);
        s.finish_round(1);
        assert_eq!(s.effects(), EffectState::default());
        assert_eq!(s.current_power(), None);
    }
}
