//! Gemini error mapping

use crate::utils::error::TransformError;
use std::time::Duration;

/// Longest response body kept in an error
const MAX_ERROR_BODY: usize = 512;

/// Maps transport and HTTP failures onto [`TransformError`]
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Non-success status with its (truncated) body
    pub fn from_http_status(status: u16, body: &str) -> TransformError {
        TransformError::status(status, truncate(body, MAX_ERROR_BODY))
    }

    /// Transport error from reqwest
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> TransformError {
        if err.is_timeout() {
            TransformError::Timeout(timeout)
        } else {
            // The URL carries the API key
            TransformError::network(err.without_url().to_string())
        }
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
