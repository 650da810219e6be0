//! Gemini Client
//!
//! One `generateContent` call per transform. Every failure maps to a
//! transient [`TransformError`]; retrying is the caller's business.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response, header::CONTENT_TYPE};
use tokio::time::timeout;

use crate::core::providers::Transformer;
use crate::utils::error::{FixmdError, TransformError};

use super::config::GeminiConfig;
use super::error::GeminiErrorMapper;
use super::models::{GeminiRequest, GeminiResponse};

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    /// Create
    pub fn new(config: GeminiConfig) -> Result<Self, FixmdError> {
        let http_client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Request body for `content`
    pub fn build_request(&self, content: &str) -> GeminiRequest {
        GeminiRequest::user_turn(&self.config.system_prompt, content)
    }

    /// Send one request and return the first candidate's text
    pub async fn generate(&self, content: &str) -> Result<String, TransformError> {
        let body = self.build_request(content);
        let request_timeout = self.config.request_timeout;

        tracing::debug!(
            url = %self.config.api_url,
            bytes = content.len(),
            "Gemini request"
        );

        let response = timeout(
            // Outer guard a little past the client timeout so reqwest reports first
            request_timeout + Duration::from_secs(1),
            self.http_client
                .post(&self.config.api_url)
                .query(&[("key", self.config.api_key.as_str())])
                .header(CONTENT_TYPE, "application/json")
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| TransformError::Timeout(request_timeout))?
        .map_err(|e| GeminiErrorMapper::from_reqwest(e, request_timeout))?;

        self.handle_response(response).await
    }

    /// Handle
    async fn handle_response(&self, response: Response) -> Result<String, TransformError> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GeminiErrorMapper::from_reqwest(e, self.config.request_timeout))?;

        tracing::debug!(status = status.as_u16(), bytes = response_text.len(), "Gemini response");

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            TransformError::malformed(format!("Failed to parse response JSON: {}", e))
        })?;

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or(TransformError::EmptyResponse)
    }
}

#[async_trait]
impl Transformer for GeminiClient {
    async fn transform(&self, content: &str) -> Result<String, TransformError> {
        self.generate(content).await
    }
}
