//! Admission limiting for calls to the remote service

use crate::utils::error::{FixmdError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::trace;

/// Bulkhead pattern: at most `max_concurrent` guarded futures run at once
#[derive(Debug, Clone)]
pub struct Bulkhead {
    semaphore: Arc<Semaphore>,
    name: String,
    max_concurrent: usize,
}

impl Bulkhead {
    /// Create a new bulkhead
    pub fn new(name: impl Into<String>, max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            name: name.into(),
            max_concurrent,
        }
    }

    /// Run `f` while holding a permit.
    ///
    /// The permit is released when `f` completes or is dropped, whatever
    /// its outcome.
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: std::future::Future<Output = R>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| FixmdError::internal(format!("Bulkhead acquire failed: {}", e)))?;

        trace!(bulkhead = %self.name, "permit acquired");
        let result = f.await;
        trace!(bulkhead = %self.name, "permit released");

        Ok(result)
    }

    /// Get available permits
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get maximum concurrent operations
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
