//! Limiter Configuration
//!
//! Serializable parameters for building a [`Limiter`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::error::RateLimitError;
use super::limiter::Limiter;

/// Default seconds per refill tick
pub const DEFAULT_INTERVAL_SECS: i64 = 1;

/// Default ceiling: one token per second at the default interval
pub const DEFAULT_QUANTUM: i64 = 3600;

/// Limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Seconds that must elapse per refill tick
    pub interval_secs: i64,

    /// Capacity ceiling; each tick refills `quantum / 3600` tokens
    pub quantum: i64,

    /// Starting capacity (a full bucket when unset)
    pub initial: Option<i64>,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            quantum: DEFAULT_QUANTUM,
            initial: None,
        }
    }
}

impl LimiterConfig {
    /// Create a configuration with explicit parameters
    pub fn new(interval_secs: i64, quantum: i64, initial: i64) -> Self {
        Self {
            interval_secs,
            quantum,
            initial: Some(initial),
        }
    }

    /// Starting capacity after defaults are applied
    pub fn initial_capacity(&self) -> i64 {
        self.initial.unwrap_or(self.quantum)
    }

    /// Get refill duration
    pub fn refill_duration(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(0) as u64)
    }

    /// Check the parameters a limiter needs for well-defined refills
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not positive, the quantum is
    /// negative, or the initial capacity falls outside `0..=quantum`.
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.interval_secs <= 0 {
            return Err(RateLimitError::InvalidInterval {
                interval: self.interval_secs,
            });
        }

        if self.quantum < 0 {
            return Err(RateLimitError::InvalidQuantum {
                quantum: self.quantum,
            });
        }

        let initial = self.initial_capacity();
        if initial < 0 || initial > self.quantum {
            return Err(RateLimitError::InvalidInitial {
                initial,
                quantum: self.quantum,
            });
        }

        Ok(())
    }

    /// Validate and build a limiter on the system clock
    pub fn build(&self) -> Result<Limiter<SystemClock>, RateLimitError> {
        self.build_with_clock(SystemClock)
    }

    /// Validate and build a limiter on the given clock
    pub fn build_with_clock<C: Clock>(&self, clock: C) -> Result<Limiter<C>, RateLimitError> {
        self.validate()?;
        Ok(Limiter::with_clock(
            self.interval_secs,
            self.quantum,
            self.initial_capacity(),
            clock,
        ))
    }
}
