use rand::Rng;
use tracing::{debug, warn};

use crate::engine::error::SupplyError;
use crate::engine::fall::{ActiveWord, WordId};
use crate::engine::matcher::eq_ignore_case;
use crate::engine::scheduler::Clock;
use crate::engine::session::{GameEvent, GameSession, Notice, Task};
use crate::generator::{WordEntry, WordSource};

/// Identifies one outstanding word fetch. Results carrying any other ticket
/// are stale and get dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnTicket(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    pub ticket: SpawnTicket,
    pub count: usize,
    pub level: u32,
}

impl GameSession {
    pub fn can_spawn(&self) -> bool {
        self.phase.is_active()
            && !self.paused
            && !self.exited
            && !self.cooldown
            && self.pending_fetch.is_none()
            && self.active.len() < self.tuning.max_active_words
    }

    /// Asks for a new word if the board has room. The request waits in the
    /// outbox until the owner collects it with `take_spawn_requests`.
    pub(crate) fn try_spawn(&mut self) {
        if !self.can_spawn() {
            return;
        }
        let ticket = SpawnTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_fetch = Some(ticket);
        self.requests.push(SpawnRequest {
            ticket,
            count: 1,
            level: self.level,
        });
    }

    pub fn take_spawn_requests(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Places the word a fetch returned. Failures and unusable answers fall
    /// back to the built-in pool. Returns the new word's id, or `None` when
    /// the ticket is stale or the board filled up meanwhile.
    pub fn complete_spawn(
        &mut self,
        ticket: SpawnTicket,
        result: Result<Vec<WordEntry>, SupplyError>,
    ) -> Option<WordId> {
        if self.pending_fetch != Some(ticket) {
            debug!(ticket = ticket.0, "dropping stale word fetch");
            return None;
        }
        self.pending_fetch = None;
        if self.exited || !self.phase.is_active() || self.active.len() >= self.tuning.max_active_words {
            return None;
        }

        let taken: Vec<String> = self.active.iter().map(|w| w.text.clone()).collect();
        let fetched = match result {
            Ok(entries) => entries
                .into_iter()
                .map(|e| e.text.trim().to_string())
                .find(|t| !t.is_empty() && !taken.iter().any(|a| eq_ignore_case(a, t))),
            Err(err) => {
                warn!(error = %err, "word fetch failed, using built-in pool");
                None
            }
        };
        let text = match fetched {
            Some(text) => text,
            None => {
                let exclude: Vec<&str> = taken.iter().map(String::as_str).collect();
                self.pool.pick(&mut self.rng, &exclude)?
            }
        };

        let jitter = if self.tuning.fall_jitter_secs > 0.0 {
            self.rng.gen_range(0.0..self.tuning.fall_jitter_secs)
        } else {
            0.0
        };
        let duration = self.tuning.fall_duration(self.level, self.phase.round(), jitter);
        let x = self.spawn_x(&text);
        let id = WordId(self.next_word_id);
        self.next_word_id += 1;
        debug!(word = %text, duration, x, "word spawned");
        self.events.push(GameEvent::WordSpawned {
            id,
            text: text.clone(),
        });
        self.active.push(ActiveWord::new(id, text, duration, x));
        Some(id)
    }

    /// Answers every queued request from `source` right away.
    pub fn resolve_spawns_with(&mut self, source: &dyn WordSource) -> Vec<WordId> {
        self.take_spawn_requests()
            .into_iter()
            .filter_map(|req| {
                let result = source.fetch_words(req.count, req.level);
                self.complete_spawn(req.ticket, result)
            })
            .collect()
    }

    pub fn play_width(&self) -> u16 {
        self.play_width
    }

    pub fn set_play_width(&mut self, width: u16) {
        self.play_width = width;
    }

    fn spawn_x(&mut self, text: &str) -> u16 {
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let room = self.play_width.saturating_sub(width);
        let pad = self.tuning.spawn_padding.min(room / 2);
        let span = room - pad.saturating_mul(2);
        pad + self.rng.gen_range(0..=span)
    }

    pub(crate) fn start_spawn_interval(&mut self) {
        let stale = self.timers.spawn.take();
        self.cancel_timer(stale);
        let every = self.tuning.density_ms(self.level);
        self.timers.spawn = Some(self.scheduler.schedule_every(Clock::Game, every, Task::Spawn));
    }

    /// Picks up a new spawn density after a level change.
    pub(crate) fn restart_spawn_interval(&mut self) {
        if self.phase.is_active() && self.timers.spawn.is_some() {
            self.start_spawn_interval();
        }
    }

    pub(crate) fn on_word_landed(&mut self, id: WordId) {
        let Some(word) = self.remove_word(id) else {
            return;
        };
        let misses = self.ledger.record_miss(self.tuning.max_misses);
        debug!(word = %word.text, misses, "word reached the floor");
        self.events.push(GameEvent::Missed {
            id,
            text: word.text,
            misses,
        });
        self.show_notice(Notice::TooSlow);
        self.start_cooldown();
        if misses >= self.tuning.max_misses {
            self.end_game();
        }
    }

    fn start_cooldown(&mut self) {
        let stale = self.timers.cooldown.take();
        self.cancel_timer(stale);
        self.cooldown = true;
        let ms = self.tuning.miss_cooldown_ms(self.level);
        self.timers.cooldown = Some(self.scheduler.schedule_once(Clock::Game, ms, Task::CooldownOver));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::session::SessionSettings;
    use crate::engine::tuning::Tuning;
    use crate::generator::pool::WordPool;

    fn started(tuning: Tuning) -> GameSession {
        let settings = SessionSettings {
            tuning,
            pool: WordPool::from_words(vec!["neon".into(), "cyber".into()]),
            ..SessionSettings::default()
        };
        let mut s = GameSession::new(settings, SmallRng::seed_from_u64(4));
        let wait = s.tuning.intermission_secs as u64;
        s.advance(Duration::from_secs(wait));
        s
    }

    #[test]
    fn test_round_start_requests_one_word() {
        let mut s = started(Tuning::default());
        let reqs = s.take_spawn_requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].count, 1);
        assert_eq!(reqs[0].level, 1);
        assert!(s.has_pending_fetch());
        assert!(!s.can_spawn());
    }

    #[test]
    fn test_failed_fetch_falls_back_to_pool() {
        let mut s = started(Tuning::default());
        let req = s.take_spawn_requests().remove(0);
        let id = s.complete_spawn(req.ticket, Err(SupplyError::Status(500)));
        assert!(id.is_some());
        let text = &s.active_words()[0].text;
        assert!(text == "neon" || text == "cyber");
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut s = started(Tuning::default());
        let req = s.take_spawn_requests().remove(0);
        assert!(s.complete_spawn(SpawnTicket(req.ticket.0 + 5), Ok(vec![WordEntry::new("neon")])).is_none());
        assert!(s.complete_spawn(req.ticket, Ok(vec![WordEntry::new("neon")])).is_some());
        assert!(s.complete_spawn(req.ticket, Ok(vec![WordEntry::new("cyber")])).is_none());
        assert_eq!(s.active_words().len(), 1);
    }

    #[test]
    fn test_duplicate_of_board_word_is_replaced() {
        let tuning = Tuning {
            max_active_words: 2,
            ..Tuning::default()
        };
        let mut s = started(tuning);
        let req = s.take_spawn_requests().remove(0);
        s.complete_spawn(req.ticket, Ok(vec![WordEntry::new("neon")]));
        s.try_spawn();
        let req = s.take_spawn_requests().remove(0);
        s.complete_spawn(req.ticket, Ok(vec![WordEntry::new("NEON")]));
        let texts: Vec<&str> = s.active_words().iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["neon", "cyber"]);
    }

    #[test]
    fn test_spawn_x_stays_inside_play_area() {
        let mut s = started(Tuning::default());
        s.set_play_width(20);
        for _ in 0..100 {
            let x = s.spawn_x("cyber");
            assert!(x >= 2 && x + 5 + 2 <= 20, "x = {x}");
        }
    }

    #[test]
    fn test_oversized_padding_shrinks_to_fit() {
        let mut s = started(Tuning {
            spawn_padding: u16::MAX,
            ..Tuning::default()
        });
        s.set_play_width(20);
        for _ in 0..20 {
            let x = s.spawn_x("cyber");
            assert!(x + 5 <= 20, "x = {x}");
        }
        s.set_play_width(3);
        assert_eq!(s.spawn_x("cyber"), 0);
    }

    #[test]
    fn test_no_spawn_while_cooling_down() {
        let mut s = started(Tuning::default());
        s.take_spawn_requests();
        s.pending_fetch = None;
        s.start_cooldown();
        s.try_spawn();
        assert!(s.take_spawn_requests().is_empty());
        s.advance(Duration::from_millis(s.tuning.miss_cooldown_ms(1)));
        assert!(!s.in_cooldown());
    }
}
