//! Retrying transform client

use super::Transformer;
use crate::utils::error::TransformError;
use crate::utils::error::recovery::{RetryConfig, RetryPolicy, Retryable};
use async_trait::async_trait;

impl Retryable for TransformError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Wraps a transformer with exponential backoff and jitter.
///
/// Transient failures are retried until the attempt budget runs out, then
/// surface as [`TransformError::Exhausted`] carrying the last error. A
/// successful attempt returns its output untouched.
#[derive(Debug, Clone)]
pub struct RetryingTransformer<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transformer> RetryingTransformer<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self {
            inner,
            policy: RetryPolicy::new(config),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transformer> Transformer for RetryingTransformer<T> {
    async fn transform(&self, content: &str) -> Result<String, TransformError> {
        self.policy
            .call(|| self.inner.transform(content))
            .await
            .map_err(|exhausted| {
                if exhausted.last_error.is_transient() {
                    TransformError::exhausted(exhausted.attempts, exhausted.last_error)
                } else {
                    exhausted.last_error
                }
            })
    }
}
