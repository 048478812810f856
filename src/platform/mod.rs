//! Platform abstraction layer
//!
//! Handles the outside world the game needs:
//! - Monotonic time (`Clock`)
//! - One-shot timers (`Scheduler`)
//!
//! `ManualScheduler` is a fake clock with an ordered timer queue. Tests step
//! it explicitly; the web build steps it from the frame loop with real time.

use serde::Serialize;

use crate::sim::PowerUpKind;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerHandle(pub u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Timer {
    /// Advance the snake one cell
    Move,
    /// Periodic power-up spawn
    SpawnPowerUp,
    /// Remove an uncollected power-up
    DespawnPowerUp,
    /// A timed effect runs out
    EffectExpired(PowerUpKind),
}

/// One-shot timer service. Fired timers are handed back to the game one at
/// a time, never concurrently.
pub trait Scheduler: Clock {
    /// Fire `timer` after `delay_ms`
    fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle;
    /// Drop a pending timer (no-op if it already fired)
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: u64,
    handle: TimerHandle,
    timer: Timer,
}

/// Deterministic scheduler driven by explicit time steps
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `now_ms`
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Remove and return the earliest timer due at or before `until_ms`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, Timer)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.handle))
            .map(|(i, _)| i)?;
        let fired = self.pending.swap_remove(index);
        self.now_ms = self.now_ms.max(fired.due_ms);
        Some((fired.handle, fired.timer))
    }

    /// Move the clock forward (never backward)
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pending timers as (due time, timer), earliest first
    pub fn pending(&self) -> Vec<(u64, Timer)> {
        let mut list: Vec<_> = self.pending.iter().map(|p| (p.due_ms, p.handle, p.timer)).collect();
        list.sort_by_key(|(due, handle, _)| (*due, *handle));
        list.into_iter().map(|(due, _, timer)| (due, timer)).collect()
    }

    /// Due time of the first pending `timer`
    pub fn due_of(&self, timer: Timer) -> Option<u64> {
        self.pending()
            .into_iter()
            .find(|(_, t)| *t == timer)
            .map(|(due, _)| due)
    }
}

impl Clock for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms,
            handle,
            timer,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
