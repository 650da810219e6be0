//! Transform providers
//!
//! A [`Transformer`] turns one text into another with a single remote call.
//! [`RetryingTransformer`] wraps any transformer with bounded backoff.

pub mod gemini;
pub mod retrying;

pub use gemini::{GeminiClient, GeminiConfig};
pub use retrying::RetryingTransformer;

use crate::utils::error::TransformError;
use async_trait::async_trait;
use std::sync::Arc;

/// Opaque `text -> text` operation that may fail transiently
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, content: &str) -> Result<String, TransformError>;
}

#[async_trait]
impl<T: Transformer + ?Sized> Transformer for Arc<T> {
    async fn transform(&self, content: &str) -> Result<String, TransformError> {
        (**self).transform(content).await
    }
}
