//! Timer service used by the board for bomb fuses and fire burn times.
//!
//! The board never reads a wall clock. It registers one-shot [`TimerEvent`]s
//! with a [`TimerService`] and is told to run them when the owner of the
//! board advances time. [`TimerQueue`] is the default, fully deterministic
//! implementation: a virtual clock plus a queue ordered by deadline and then
//! by registration order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::Duration;

use crate::grid::Coord;

/// Handle to a pending registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What to do when a timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Fuse expiry of the bomb at this coordinate.
    Detonate(Coord),
    /// End of the burn at this coordinate.
    Extinguish(Coord),
}

pub trait TimerService {
    /// Current session time.
    fn now(&self) -> Duration;

    /// Registers `event` to run `delay` from now.
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId;

    /// Drops a pending registration. Returns `false` if it already fired or
    /// was never registered.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Moves a pending registration to `delay` from now, keeping its id.
    fn reset(&mut self, id: TimerId, delay: Duration) -> bool;

    /// Pops the earliest registration due at or before `until` and moves the
    /// clock to its deadline. With nothing due, moves the clock to `until`
    /// and returns `None`.
    fn expire(&mut self, until: Duration) -> Option<TimerEvent>;

    /// Number of pending registrations.
    fn pending(&self) -> usize;
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerId)>,
    entries: HashMap<TimerId, (Duration, TimerEvent)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline of a pending registration.
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.entries.get(&id).map(|(deadline, _)| *deadline)
    }
}

impl TimerService for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = self.now + delay;
        self.queue.insert((deadline, id));
        self.entries.insert(id, (deadline, event));
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.remove(&id) {
            Some((deadline, _)) => {
                self.queue.remove(&(deadline, id));
                true
            }
            None => false,
        }
    }

    fn reset(&mut self, id: TimerId, delay: Duration) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        self.queue.remove(&(entry.0, id));
        entry.0 = self.now + delay;
        self.queue.insert((entry.0, id));
        true
    }

    fn expire(&mut self, until: Duration) -> Option<TimerEvent> {
        match self.queue.first().copied() {
            Some((deadline, id)) if deadline <= until => {
                self.queue.remove(&(deadline, id));
                let (_, event) = self.entries.remove(&id)?;
                self.now = self.now.max(deadline);
                Some(event)
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    fn pending(&self) -> usize {
        self.entries.len()
    }
}
