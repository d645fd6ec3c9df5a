//! Rate Limit Error Types
//!
//! The limiter operations themselves never fail; these errors come from
//! validating a configuration before a limiter is built from it.

/// Error types for limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// Interval must be a positive number of seconds
    #[error("Invalid refill interval: {interval}s. Interval must be greater than zero.")]
    InvalidInterval {
        /// The rejected interval
        interval: i64,
    },

    /// Quantum must not be negative
    #[error("Invalid quantum: {quantum}. Quantum must not be negative.")]
    InvalidQuantum {
        /// The rejected quantum
        quantum: i64,
    },

    /// Initial capacity must lie within `0..=quantum`
    #[error("Invalid initial capacity: {initial}. Must be between 0 and quantum ({quantum}).")]
    InvalidInitial {
        /// The rejected initial capacity
        initial: i64,

        /// Quantum it was checked against
        quantum: i64,
    },
}
