//! Time Sources
//!
//! The limiter only ever needs "now" as a whole-second Unix timestamp.
//! Reading it through a trait lets tests drive elapsed time by hand.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of whole-second Unix timestamps
pub trait Clock: Send + Sync {
    /// Current time in whole seconds since the Unix epoch
    fn now_secs(&self) -> i64;
}

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
///
/// Shared between a limiter and a test through `Arc<ManualClock>`.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start` seconds
    pub fn new(start: i64) -> Self {
        Self {
            secs: AtomicI64::new(start),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    /// Move forward (or backward, for negative `secs`)
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_secs(&self) -> i64 {
        (**self).now_secs()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_secs(&self) -> i64 {
        (**self).now_secs()
    }
}
