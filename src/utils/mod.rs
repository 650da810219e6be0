//! Utility modules for fixmd
//!
//! - **error**: Error types, retry with backoff, admission limiting
//! - **logging**: `tracing` subscriber setup

pub mod error;
pub mod logging;

pub use error::{FixmdError, Result, TransformError};
pub use logging::LoggingUtils;
