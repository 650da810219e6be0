//! Error handling for fixmd
//!
//! This module defines all error types used throughout the pipeline.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{FixmdError, Result, TransformError};
