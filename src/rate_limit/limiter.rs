//! Token Bucket Limiter
//!
//! A mutex-guarded token bucket. Callers drain it with [`Limiter::take`] and
//! it refills lazily, inside `take`, by `quantum / 3600` tokens for every
//! whole `interval` that has elapsed since the last reconciliation.
//!
//! Each reconciliation moves the reference timestamp to "now" even when no
//! whole interval has elapsed, so the leftover fraction of an interval is
//! dropped. Callers that `take` more often than once per `interval` never
//! see a refill.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, trace, warn};

use super::clock::{Clock, SystemClock};

/// Divisor turning `quantum` into the per-tick refill amount
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Operations shared by every limiter implementation
pub trait RateLimit: Send + Sync {
    /// Take up to `n` tokens, returning how many were granted
    fn take(&self, n: i64) -> i64;

    /// Replace the refill interval (seconds per tick)
    fn reset_interval(&self, interval: i64);

    /// Replace the capacity ceiling
    fn reset_quantum(&self, quantum: i64);
}

#[derive(Debug)]
struct State {
    /// Timestamp of the last reconciliation
    current: i64,

    /// Seconds per refill tick
    interval: i64,

    /// Capacity ceiling, also the basis of the refill rate
    quantum: i64,

    /// Tokens available right now
    capacity: i64,

    granted_total: i64,
    throttled_calls: u64,
}

impl State {
    fn refill_per_tick(&self) -> i64 {
        self.quantum / SECONDS_PER_HOUR
    }

    fn replenish(&mut self, now: i64) {
        let elapsed = now.saturating_sub(self.current).max(0);
        let ticks = if self.interval > 0 {
            elapsed / self.interval
        } else {
            warn!(
                interval = self.interval,
                "Non-positive refill interval, skipping replenishment"
            );
            0
        };

        let added = ticks.saturating_mul(self.refill_per_tick());
        if added != 0 {
            debug!(ticks, added, capacity = self.capacity, "Replenishing bucket");
        }

        self.capacity = self.capacity.saturating_add(added);
        if self.capacity > self.quantum {
            self.capacity = self.quantum;
        }
        if self.capacity < 0 {
            self.capacity = 0;
        }

        self.current = self.current.max(now);
    }
}

/// Point-in-time view of a limiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimiterStats {
    /// Seconds per refill tick
    pub interval: i64,

    /// Capacity ceiling
    pub quantum: i64,

    /// Tokens available at the last reconciliation
    pub capacity: i64,

    /// Timestamp of the last reconciliation
    pub last_reconciled: i64,

    /// Tokens handed out since construction
    pub granted_total: i64,

    /// Calls that received fewer tokens than requested
    pub throttled_calls: u64,

    /// Share of the ceiling currently drained
    pub utilization_percent: f64,
}

/// Thread-safe token bucket
///
/// Every operation runs under a single per-instance lock, so independent
/// limiters never contend with each other.
#[derive(Debug)]
pub struct Limiter<C = SystemClock> {
    state: Mutex<State>,
    clock: C,
}

impl Limiter<SystemClock> {
    /// Create a limiter driven by the system clock
    ///
    /// `interval` should be positive; with a non-positive interval the
    /// bucket is simply never refilled.
    pub fn new(interval: i64, quantum: i64, initial: i64) -> Self {
        Self::with_clock(interval, quantum, initial, SystemClock)
    }
}

impl<C: Clock> Limiter<C> {
    /// Create a limiter reading time from `clock`
    pub fn with_clock(interval: i64, quantum: i64, initial: i64, clock: C) -> Self {
        let current = clock.now_secs();
        Self {
            state: Mutex::new(State {
                current,
                interval,
                quantum,
                capacity: initial.max(0),
                granted_total: 0,
                throttled_calls: 0,
            }),
            clock,
        }
    }

    // State is plain integers and every write completes before unlock,
    // so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take up to `n` tokens
    ///
    /// Returns `n` when the bucket holds enough, otherwise drains the bucket
    /// and returns what was left. A non-positive `n` returns 0 without
    /// touching the bucket or the clock. Never blocks waiting for tokens.
    pub fn take(&self, n: i64) -> i64 {
        let mut state = self.lock();
        if n <= 0 {
            return 0;
        }

        state.replenish(self.clock.now_secs());

        if state.capacity < n {
            let granted = state.capacity;
            state.capacity = 0;
            state.granted_total = state.granted_total.saturating_add(granted);
            state.throttled_calls += 1;
            debug!(requested = n, granted, "Bucket drained, partial grant");
            return granted;
        }

        state.capacity -= n;
        state.granted_total = state.granted_total.saturating_add(n);
        trace!(granted = n, remaining = state.capacity, "Tokens granted");
        n
    }

    /// Replace the refill interval, effective from the next `take`
    pub fn reset_interval(&self, interval: i64) {
        let mut state = self.lock();
        info!(from = state.interval, to = interval, "Resetting refill interval");
        state.interval = interval;
    }

    /// Replace the capacity ceiling
    ///
    /// Lowering the ceiling does not shrink the bucket right away; the
    /// clamp happens on the next `take`.
    pub fn reset_quantum(&self, quantum: i64) {
        let mut state = self.lock();
        info!(from = state.quantum, to = quantum, "Resetting quantum");
        state.quantum = quantum;
    }

    /// Tokens available as of the last reconciliation
    pub fn available(&self) -> i64 {
        self.lock().capacity
    }

    pub fn interval(&self) -> i64 {
        self.lock().interval
    }

    pub fn quantum(&self) -> i64 {
        self.lock().quantum
    }

    pub fn last_reconciled(&self) -> i64 {
        self.lock().current
    }

    /// Seconds until `n` tokens could be granted, assuming no other caller
    /// takes in the meantime
    ///
    /// Returns `None` when `n` can never be granted: it exceeds the ceiling,
    /// the per-tick refill is zero, or the interval is not positive.
    pub fn retry_after_secs(&self, n: i64) -> Option<i64> {
        let state = self.lock();
        if n <= 0 {
            return Some(0);
        }
        if n > state.quantum {
            return None;
        }
        if n <= state.capacity.min(state.quantum) {
            return Some(0);
        }

        let per_tick = state.refill_per_tick();
        if per_tick <= 0 || state.interval <= 0 {
            return None;
        }

        let needed = n - state.capacity;
        let ticks = needed / per_tick + i64::from(needed % per_tick != 0);
        let ready_at = state
            .current
            .saturating_add(ticks.saturating_mul(state.interval));
        Some(ready_at.saturating_sub(self.clock.now_secs()).max(0))
    }

    /// Snapshot of the bucket and its counters
    pub fn stats(&self) -> LimiterStats {
        let state = self.lock();
        let utilization_percent = if state.quantum > 0 {
            let drained = (state.quantum - state.capacity).max(0) as f64;
            (drained / state.quantum as f64) * 100.0
        } else {
            0.0
        };

        LimiterStats {
            interval: state.interval,
            quantum: state.quantum,
            capacity: state.capacity,
            last_reconciled: state.current,
            granted_total: state.granted_total,
            throttled_calls: state.throttled_calls,
            utilization_percent,
        }
    }
}

impl<C: Clock> RateLimit for Limiter<C> {
    fn take(&self, n: i64) -> i64 {
        Limiter::take(self, n)
    }

    fn reset_interval(&self, interval: i64) {
        Limiter::reset_interval(self, interval)
    }

    fn reset_quantum(&self, quantum: i64) {
        Limiter::reset_quantum(self, quantum)
    }
}
