//! Types and configurations for error recovery patterns

use crate::config::defaults;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for the un-jittered delay
    pub max_delay: Duration,
    /// Symmetric jitter as a fraction of the delay (0.2 means ±20%)
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            initial_delay: defaults::INITIAL_BACKOFF,
            max_delay: defaults::MAX_BACKOFF,
            jitter_ratio: defaults::JITTER_RATIO,
        }
    }
}

/// Errors that can tell whether another attempt is worthwhile
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Returned by [`RetryPolicy::call`](super::RetryPolicy::call) once the
/// policy gives up
#[derive(Debug, Clone, PartialEq)]
pub struct RetryExhausted<E> {
    /// Attempts actually made
    pub attempts: u32,
    /// Error of the final attempt
    pub last_error: E,
}
