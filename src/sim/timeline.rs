//! Logical clock and scheduled transitions
//!
//! Engines never block or sleep. A delayed transition is an entry on the
//! owning engine's timeline and fires when `tick` moves the clock past its due
//! time. Dropping or quitting the engine drops its entries with it, so nothing
//! can fire into a game that has been left.

/// A transition waiting on the clock
#[derive(Debug, Clone)]
struct Scheduled<A> {
    due_ms: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    action: A,
}

/// Pending transitions for one engine instance
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<Scheduled<A>>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current logical time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queue `action` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.push(Scheduled {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            action,
        });
    }

    /// Remove and return the earliest entry due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<A> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.seq))
            .map(|(i, _)| i)?;
        let entry = self.pending.swap_remove(idx);
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry.action)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Drop every pending entry
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Countdown for a timed campaign level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelClock {
    pub limit_secs: u32,
    deadline_ms: u64,
}

impl LevelClock {
    /// Clock that runs out `limit_secs` after `start_ms`
    pub fn starting_at(start_ms: u64, limit_secs: u32) -> Self {
        Self {
            limit_secs,
            deadline_ms: start_ms.saturating_add(u64::from(limit_secs) * 1000),
        }
    }

    /// Whole seconds left as the countdown displays them (rounded up)
    pub fn remaining_secs(&self, now_ms: u64) -> u32 {
        self.deadline_ms.saturating_sub(now_ms).div_ceil(1000) as u32
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }

    /// Latest instant a transition may fire and still beat the clock
    pub fn last_playable_ms(&self) -> u64 {
        self.deadline_ms.saturating_sub(1)
    }
}
