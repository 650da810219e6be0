//! Gemini client configuration

use crate::config::defaults;
use std::fmt;
use std::time::Duration;

/// Settings for the Gemini client
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Full `generateContent` endpoint URL
    pub api_url: String,
    /// Per-call timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Instruction preamble sent before the content
    pub system_prompt: String,
}

impl GeminiConfig {
    /// Defaults with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: defaults::DEFAULT_GEMINI_API_URL.to_string(),
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// The key stays out of logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
