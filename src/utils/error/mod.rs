//! Error handling utilities
//!
//! Error taxonomy plus the retry and admission-limiting primitives.

pub mod error;
pub mod recovery;

pub use error::*;
pub use recovery::*;
