//! Helper functions for creating specific error types

use super::types::{FixmdError, TransformError};
use std::path::PathBuf;

/// Helper functions for creating specific errors
impl FixmdError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn invalid_path<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl TransformError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn status<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn exhausted(attempts: u32, last: TransformError) -> Self {
        Self::Exhausted {
            attempts,
            last: Box::new(last),
        }
    }
}
