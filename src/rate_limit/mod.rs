//! Rate Limiting Module
//!
//! This module provides a process-local token bucket for bounding how much
//! work a service performs over time.
//!
//! # Features
//!
//! - Non-blocking `take`: grants what is available, never waits
//! - Lazy replenishment of `quantum / 3600` tokens per elapsed interval
//! - Runtime reconfiguration of interval and quantum
//! - Injectable clock for deterministic tests
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                   Limiter                      │
//! ├───────────────────────────────────────────────┤
//! │  Mutex<State>                                  │
//! │    current · interval · quantum · capacity     │
//! ├───────────────────────────────────────────────┤
//! │  Clock (SystemClock | ManualClock)             │
//! └───────────────────────────────────────────────┘
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;

#[cfg(test)]
mod proptests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LimiterConfig;
pub use error::RateLimitError;
pub use limiter::{Limiter, LimiterStats, RateLimit, SECONDS_PER_HOUR};
