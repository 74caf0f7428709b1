use std::time::Duration;

use rand::rngs::SmallRng;

use crate::engine::fall::{ActiveWord, WordId};
use crate::engine::ledger::{Ledger, hit_points, lands_on_level_up};
use crate::engine::powerup::{Checkpoints, EffectState, PowerUp, UnlockPolicy};
use crate::engine::progression::Phase;
use crate::engine::scheduler::{Clock, Scheduler, TimerId};
use crate::engine::spawn::{SpawnRequest, SpawnTicket};
use crate::engine::tuning::Tuning;
use crate::generator::pool::WordPool;

/// Final numbers handed to the game-over listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub accuracy: u32,
    pub level: u32,
    pub round: u32,
}

/// Things that happened during `advance`/`submit`/`activate_power`, drained
/// by the caller with `drain_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    RoundCleared { round: u32 },
    WordSpawned { id: WordId, text: String },
    Hit { id: WordId, text: String, points: u64 },
    Slashed { id: WordId, text: String, points: u64 },
    Wrong { input: String },
    Missed { id: WordId, text: String, misses: u32 },
    LevelUp { level: u32 },
    PowerUnlocked(PowerUp),
    PowerActivated(PowerUp),
    GameOver(GameSummary),
    Exited,
}

/// Short-lived banner shown over the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    OnFire { streak: u32 },
    Wrong,
    TooSlow,
    LevelUp { level: u32 },
    PowerUnlocked(PowerUp),
    Healed,
    Slashed,
}

impl Notice {
    pub fn duration_ms(self, base_ms: u64) -> u64 {
        match self {
            Notice::Wrong => base_ms * 3 / 4,
            Notice::OnFire { .. } => base_ms * 5 / 4,
            _ => base_ms,
        }
    }
}

/// Outcome of pressing Enter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Ignored,
    Hit { text: String, points: u64 },
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    Slow,
    Freeze,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    Tick,
    Spawn,
    CooldownOver,
    EffectOver(Effect),
    SkipResolve(WordId),
    NoticeOver,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Timers {
    pub spawn: Option<TimerId>,
    pub cooldown: Option<TimerId>,
    pub slow: Option<TimerId>,
    pub freeze: Option<TimerId>,
    pub skip: Option<TimerId>,
    pub notice: Option<TimerId>,
}

pub struct SessionSettings {
    pub tuning: Tuning,
    pub unlock_policy: UnlockPolicy,
    pub play_width: u16,
    pub pool: WordPool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            unlock_policy: UnlockPolicy::default(),
            play_width: 80,
            pool: WordPool::load(),
        }
    }
}

/// One play-through, from the first countdown to game over.
///
/// All timing runs on an internal scheduler; nothing happens unless the
/// owner calls [`GameSession::advance`].
pub struct GameSession {
    pub(crate) tuning: Tuning,
    pub(crate) unlock_policy: UnlockPolicy,
    pub(crate) phase: Phase,
    pub(crate) level: u32,
    pub(crate) timer: u32,
    pub(crate) ledger: Ledger,
    pub(crate) active: Vec<ActiveWord>,
    pub(crate) input: String,
    pub(crate) current_power: Option<PowerUp>,
    pub(crate) effects: EffectState,
    pub(crate) checkpoints: Checkpoints,
    pub(crate) paused: bool,
    pub(crate) exited: bool,
    pub(crate) game_over_sent: bool,
    pub(crate) cooldown: bool,
    pub(crate) pending_fetch: Option<SpawnTicket>,
    pub(crate) requests: Vec<SpawnRequest>,
    pub(crate) next_ticket: u64,
    pub(crate) next_word_id: u64,
    pub(crate) play_width: u16,
    pub(crate) scheduler: Scheduler<Task>,
    pub(crate) timers: Timers,
    pub(crate) notice: Option<Notice>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) pool: WordPool,
    pub(crate) rng: SmallRng,
}

impl GameSession {
    pub fn new(settings: SessionSettings, rng: SmallRng) -> Self {
        let SessionSettings {
            tuning,
            unlock_policy,
            play_width,
            pool,
        } = settings;
        let mut scheduler = Scheduler::new();
        scheduler.schedule_every(Clock::Game, 1000, Task::Tick);
        Self {
            phase: Phase::Intermission {
                round: 1,
                remaining: tuning.intermission_secs,
            },
            level: 1,
            timer: tuning.round_secs,
            tuning,
            unlock_policy,
            ledger: Ledger::default(),
            active: Vec::new(),
            input: String::new(),
            current_power: None,
            effects: EffectState::default(),
            checkpoints: Checkpoints::default(),
            paused: false,
            exited: false,
            game_over_sent: false,
            cooldown: false,
            pending_fetch: None,
            requests: Vec::new(),
            next_ticket: 0,
            next_word_id: 0,
            play_width,
            scheduler,
            timers: Timers::default(),
            notice: None,
            events: Vec::new(),
            pool,
            rng,
        }
    }

    // ---- time ----

    /// Moves the session forward by `dt` of real time. Long steps are cut at
    /// every timer and landing so they behave like many short ones.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt.as_millis() as u64;
        loop {
            self.run_due_tasks();
            if remaining == 0 || self.exited {
                break;
            }
            let mut step = remaining;
            if let Some(due) = self.scheduler.next_due_in(self.paused) {
                step = step.min(due.max(1));
            }
            if let Some(land) = self.next_landing_ms() {
                step = step.min(land.max(1));
            }
            self.animate(step);
            self.scheduler.advance_by(step, self.paused);
            remaining -= step;
        }
    }

    fn run_due_tasks(&mut self) {
        while let Some((_, task)) = self.scheduler.pop_due(self.paused) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Tick => self.on_tick(),
            Task::Spawn => self.try_spawn(),
            Task::CooldownOver => {
                self.cooldown = false;
                self.timers.cooldown = None;
            }
            Task::EffectOver(effect) => self.on_effect_over(effect),
            Task::SkipResolve(id) => self.on_skip_resolved(id),
            Task::NoticeOver => {
                self.notice = None;
                self.timers.notice = None;
            }
        }
    }

    fn time_scale(&self) -> f64 {
        self.effects.time_scale(self.tuning.slow_time_scale)
    }

    fn next_landing_ms(&self) -> Option<u64> {
        if self.paused || !self.phase.is_active() {
            return None;
        }
        let scale = self.time_scale();
        self.active.iter().filter_map(|w| w.ms_to_floor(scale)).min()
    }

    fn animate(&mut self, ms: u64) {
        if self.paused || !self.phase.is_active() {
            return;
        }
        let scale = self.time_scale();
        let dt = ms as f64 / 1000.0;
        let landed: Vec<WordId> = self
            .active
            .iter_mut()
            .filter_map(|w| w.advance(dt, scale).then_some(w.id))
            .collect();
        for id in landed {
            self.on_word_landed(id);
        }
    }

    // ---- input ----

    fn accepts_typing(&self) -> bool {
        !self.paused && !self.exited && !self.phase.is_over()
    }

    pub fn type_char(&mut self, ch: char) {
        if self.accepts_typing() && !ch.is_control() {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.accepts_typing() {
            self.input.pop();
        }
    }

    // ---- pause / exit ----

    pub fn pause(&mut self) -> bool {
        if self.exited || self.phase.is_over() || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    /// Leaves the session. Every timer stops and fetches still in flight are
    /// discarded when they come back.
    pub fn exit(&mut self) {
        if self.exited {
            return;
        }
        self.exited = true;
        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.pending_fetch = None;
        self.requests.clear();
        self.active.clear();
        self.effects.clear();
        self.notice = None;
        if !self.phase.is_over() {
            self.events.push(GameEvent::Exited);
        }
    }

    // ---- scoring ----

    pub(crate) fn hit_value(&self) -> u64 {
        hit_points(self.tuning.points_per_hit, self.level, self.phase.round())
    }

    /// Adds points; one level up when the new score is a multiple of the threshold.
    pub(crate) fn award_points(&mut self, points: u64) {
        let (_, after) = self.ledger.add_points(points);
        if !lands_on_level_up(after, self.tuning.level_threshold) {
            return;
        }
        self.level += 1;
        tracing::info!(level = self.level, score = after, "level up");
        self.events.push(GameEvent::LevelUp { level: self.level });
        self.show_notice(Notice::LevelUp { level: self.level });
        self.restart_spawn_interval();
    }

    pub(crate) fn show_notice(&mut self, notice: Notice) {
        let stale = self.timers.notice.take();
        self.cancel_timer(stale);
        self.notice = Some(notice);
        let ms = notice.duration_ms(self.tuning.notice_ms);
        self.timers.notice = Some(self.scheduler.schedule_once(Clock::Wall, ms, Task::NoticeOver));
    }

    pub(crate) fn cancel_timer(&mut self, id: Option<TimerId>) {
        if let Some(id) = id {
            self.scheduler.cancel(id);
        }
    }

    pub(crate) fn remove_word(&mut self, id: WordId) -> Option<ActiveWord> {
        let pos = self.active.iter().position(|w| w.id == id)?;
        Some(self.active.remove(pos))
    }

    // ---- observers ----

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn round(&self) -> u32 {
        self.phase.round()
    }

    pub fn round_speed_factor(&self) -> f64 {
        self.tuning.round_speed_factor(self.round())
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn is_intermission(&self) -> bool {
        self.phase.is_intermission()
    }

    pub fn intermission_remaining(&self) -> Option<u32> {
        match self.phase {
            Phase::Intermission { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn score(&self) -> u64 {
        self.ledger.score
    }

    pub fn misses(&self) -> u32 {
        self.ledger.misses
    }

    pub fn lives_left(&self) -> u32 {
        self.tuning.max_misses.saturating_sub(self.ledger.misses)
    }

    pub fn accuracy(&self) -> u32 {
        self.ledger.accuracy()
    }

    pub fn streak(&self) -> u32 {
        self.ledger.streak
    }

    pub fn total_typed(&self) -> u32 {
        self.ledger.total_typed
    }

    pub fn correct_typed(&self) -> u32 {
        self.ledger.correct_typed
    }

    pub fn active_words(&self) -> &[ActiveWord] {
        &self.active
    }

    pub fn current_power(&self) -> Option<PowerUp> {
        self.current_power
    }

    pub fn effects(&self) -> EffectState {
        self.effects
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.ledger.score,
            accuracy: self.ledger.accuracy(),
            level: self.level,
            round: self.phase.round(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::generator::WordEntry;

    fn session() -> GameSession {
        GameSession::new(SessionSettings::default(), SmallRng::seed_from_u64(11))
    }

    fn start_round(s: &mut GameSession) {
        s.advance(Duration::from_secs(s.tuning.intermission_secs as u64));
        assert!(s.phase.is_active());
    }

    fn place(s: &mut GameSession, text: &str) -> WordId {
        let req = s.take_spawn_requests().pop().expect("spawn request");
        s.complete_spawn(req.ticket, Ok(vec![WordEntry::new(text)]))
            .expect("word placed")
    }

    #[test]
    fn test_starts_in_intermission() {
        let s = session();
        assert!(s.is_intermission());
        assert_eq!(s.intermission_remaining(), Some(5));
        assert_eq!(s.round(), 1);
        assert_eq!(s.level(), 1);
        assert_eq!(s.timer(), 60);
    }

    #[test]
    fn test_end_game_fires_once() {
        let mut s = session();
        start_round(&mut s);
        s.end_game();
        s.end_game();
        let overs = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_typing_builds_and_submit_clears_input() {
        let mut s = session();
        start_round(&mut s);
        place(&mut s, "neon");
        for ch in "neo".chars() {
            s.type_char(ch);
        }
        s.backspace();
        assert_eq!(s.input(), "ne");
        assert_eq!(s.submit(), Submission::Wrong);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_paused_session_ignores_typing() {
        let mut s = session();
        start_round(&mut s);
        assert!(s.pause());
        s.type_char('a');
        assert_eq!(s.input(), "");
        assert!(!s.pause());
        assert!(s.resume());
    }

    #[test]
    fn test_notice_expires_on_wall_clock_even_when_paused() {
        let mut s = session();
        start_round(&mut s);
        place(&mut s, "neon");
        s.type_char('x');
        s.submit();
        assert_eq!(s.notice(), Some(Notice::Wrong));
        s.pause();
        s.advance(Duration::from_secs(2));
        assert_eq!(s.notice(), None);
    }

    #[test]
    fn test_exit_emits_once_and_stops_time() {
        let mut s = session();
        start_round(&mut s);
        let timer = s.timer();
        s.exit();
        s.exit();
        s.advance(Duration::from_secs(10));
        assert_eq!(s.timer(), timer);
        let exits = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Exited)
            .count();
        assert_eq!(exits, 1);
    }

    #[test]
    fn test_level_up_restarts_spawn_interval() {
        let mut s = session();
        start_round(&mut s);
        let before = s.timers.spawn;
        s.award_points(100);
        assert_eq!(s.level(), 2);
        assert_ne!(s.timers.spawn, before);
        assert!(s.timers.spawn.is_some());
    }

    #[test]
    fn test_hit_skipping_past_a_hundred_keeps_level() {
        let mut s = session();
        start_round(&mut s);
        s.level = 2;
        s.phase = Phase::Active { round: 2 };
        s.ledger.score = 180;
        place(&mut s, "neon");
        for ch in "neon".chars() {
            s.type_char(ch);
        }
        assert!(matches!(s.submit(), Submission::Hit { points: 40, .. }));
        assert_eq!(s.score(), 220);
        assert_eq!(s.level(), 2);
        assert!(!s.drain_events().iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
    }
}
