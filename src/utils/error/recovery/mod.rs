//! Error recovery and resilience utilities
//!
//! Retry with exponential backoff and a bulkhead that caps concurrent calls.

mod resilience;
mod retry;
mod types;

pub use resilience::Bulkhead;
pub use retry::RetryPolicy;
pub use types::{RetryConfig, RetryExhausted, Retryable};
