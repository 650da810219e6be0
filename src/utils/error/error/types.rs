//! Error types for fixmd

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fixmd
pub type Result<T> = std::result::Result<T, FixmdError>;

/// Main error type for fixmd
#[derive(Error, Debug)]
pub enum FixmdError {
    /// Configuration errors (missing credential, invalid limits)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input path does not exist or cannot be used
    #[error("Invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// Directory traversal or reading a discovered file failed
    #[error("Failed to collect '{}': {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backup directory or backup file could not be written
    #[error("Failed to back up '{}' to '{}': {source}", path.display(), backup_path.display())]
    Backup {
        path: PathBuf,
        backup_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the transformed content over the original failed
    #[error("Failed to write '{}': {source}", path.display())]
    WriteBack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transform errors
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FixmdError {
    /// Whether the error must abort the whole run.
    ///
    /// Setup and backup-phase errors are fatal. Transform and write-back
    /// errors belong to a single file and are recovered at the task boundary.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FixmdError::Transform(_) | FixmdError::WriteBack { .. })
    }
}

/// Errors produced by the remote transform call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Transport or connection failure
    #[error("Network error: {0}")]
    Network(String),

    /// The per-call timeout elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The service answered with a non-success status
    #[error("API returned error status: {status}, body: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response held no candidate or no content part
    #[error("No valid response from API")]
    EmptyResponse,

    /// The content cannot be sent at all (e.g. it is not UTF-8)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every attempt failed; carries the last underlying error
    #[error("Max retries exceeded after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<TransformError>,
    },
}

impl TransformError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            TransformError::Exhausted { .. } | TransformError::InvalidInput(_)
        )
    }
}
