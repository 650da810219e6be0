//! Retry mechanism with exponential backoff

use super::types::{RetryConfig, RetryExhausted, Retryable};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry mechanism with exponential backoff and symmetric jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Un-jittered delay after the failed attempt `attempt` (0-indexed):
    /// `min(initial_delay * 2^attempt, max_delay)`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.config.initial_delay.checked_mul(factor))
            .map_or(self.config.max_delay, |delay| delay.min(self.config.max_delay))
    }

    /// Base delay perturbed by a uniform factor in `[1 - jitter, 1 + jitter]`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let ratio = self.config.jitter_ratio;
        if ratio <= 0.0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(-ratio..=ratio);
        base.mul_f64(1.0 + jitter)
    }

    /// Execute a function with retry logic.
    ///
    /// The first attempt runs immediately. A success returns at once; a
    /// non-retryable error or the last allowed failure ends the loop.
    pub async fn call<F, Fut, R, E>(&self, mut f: F) -> std::result::Result<R, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: Retryable + std::fmt::Display,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match f().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "Retry succeeded");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    let made = attempt + 1;
                    if !err.is_retryable() {
                        error!(attempts = made, "Giving up on non-retryable error: {}", err);
                        return Err(RetryExhausted {
                            attempts: made,
                            last_error: err,
                        });
                    }
                    if made >= max_attempts {
                        error!(attempts = made, "Retry failed: {}", err);
                        return Err(RetryExhausted {
                            attempts: made,
                            last_error: err,
                        });
                    }

                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt = made,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Attempt failed: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
