//! Quantum Rate Limit Library
//!
//! This library provides a thread-safe token bucket for embedding in a
//! larger service, plus the configuration and logging setup used by the
//! `ratelimit` binary.
//!
//! ```
//! use quantum_ratelimit::rate_limit::Limiter;
//!
//! // 100 tokens per hour ceiling, refill checked every hour, start full
//! let limiter = Limiter::new(3600, 100, 100);
//! assert_eq!(limiter.take(30), 30);
//! assert_eq!(limiter.take(80), 70);
//! ```

pub mod config;
pub mod logging;
pub mod rate_limit;


pub use rate_limit::{Limiter, RateLimit};
