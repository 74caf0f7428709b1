/// Which clock a timer runs on. `Game` time stops while the session is
/// paused; `Wall` time always advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    Game,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    clock: Clock,
    due_ms: u64,
    period_ms: Option<u64>,
    seq: u64,
    task: T,
}

/// Deterministic timer queue driven by explicit `advance_by` calls.
///
/// Entries due at the same instant pop in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    game_now_ms: u64,
    wall_now_ms: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            game_now_ms: 0,
            wall_now_ms: 0,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    pub fn now_ms(&self, clock: Clock) -> u64 {
        match clock {
            Clock::Game => self.game_now_ms,
            Clock::Wall => self.wall_now_ms,
        }
    }

    pub fn schedule_once(&mut self, clock: Clock, after_ms: u64, task: T) -> TimerId {
        self.push(clock, after_ms, None, task)
    }

    /// First firing happens one full period from now.
    pub fn schedule_every(&mut self, clock: Clock, period_ms: u64, task: T) -> TimerId {
        let period = period_ms.max(1);
        self.push(clock, period, Some(period), task)
    }

    fn push(&mut self, clock: Clock, after_ms: u64, period_ms: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms(clock) + after_ms;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            id,
            clock,
            due_ms,
            period_ms,
            seq,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn runnable(clock: Clock, paused: bool) -> bool {
        !(paused && clock == Clock::Game)
    }

    /// Milliseconds until the earliest runnable entry is due.
    pub fn next_due_in(&self, paused: bool) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| Self::runnable(e.clock, paused))
            .map(|e| e.due_ms.saturating_sub(self.now_ms(e.clock)))
            .min()
    }

    pub fn advance_by(&mut self, ms: u64, paused: bool) {
        self.wall_now_ms += ms;
        if !paused {
            self.game_now_ms += ms;
        }
    }

    /// Remove and return the earliest entry that is due now. Periodic entries
    /// are re-armed one period later.
    pub fn pop_due(&mut self, paused: bool) -> Option<(TimerId, T)> {
        let (game_now, wall_now) = (self.game_now_ms, self.wall_now_ms);
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| Self::runnable(e.clock, paused))
            .filter(|(_, e)| {
                let now = match e.clock {
                    Clock::Game => game_now,
                    Clock::Wall => wall_now,
                };
                e.due_ms <= now
            })
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;

        match self.entries[idx].period_ms {
            Some(period) => {
                let seq = self.bump_seq();
                let entry = &mut self.entries[idx];
                entry.due_ms += period;
                entry.seq = seq;
                Some((entry.id, entry.task.clone()))
            }
            None => {
                let entry = self.entries.swap_remove(idx);
                Some((entry.id, entry.task))
            }
        }
    }
}
