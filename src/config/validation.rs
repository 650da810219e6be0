//! Configuration validation

use super::Config;
use crate::core::providers::gemini::GeminiConfig;
use crate::utils::error::recovery::RetryConfig;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating configuration");

        self.gemini.validate()?;
        self.retry.validate()?;

        if self.max_concurrent == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }
        if self.extension.is_empty() {
            return Err("File extension cannot be empty".to_string());
        }
        if self.backup_dir.as_os_str().is_empty() {
            return Err("Backup directory cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for GeminiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key cannot be empty".to_string());
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(format!("API URL must be http(s): {}", self.api_url));
        }
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Retry attempts must be at least 1".to_string());
        }
        if self.initial_delay > self.max_delay {
            return Err(format!(
                "Initial backoff {:?} exceeds maximum backoff {:?}",
                self.initial_delay, self.max_delay
            ));
        }
        if !(0.0..1.0).contains(&self.jitter_ratio) {
            return Err(format!(
                "Jitter ratio must be in [0, 1): {}",
                self.jitter_ratio
            ));
        }
        Ok(())
    }
}
