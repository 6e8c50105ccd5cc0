// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`] which handles authentication, endpoint
//! construction, streaming SSE responses, and transient error retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use rolecall_core::RolecallError;
use tracing::{debug, warn};

use crate::sse::{self, ResponseStream};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
///
/// The model is part of the URL, so one client serves every model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// `base_url` is the API root including the version segment, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, RolecallError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                RolecallError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RolecallError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries: 0,
        })
    }

    /// Sets how many times 429/500/503 responses are retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Transport failure; timeouts keep their own variant.
    fn request_error(&self, e: reqwest::Error) -> RolecallError {
        if e.is_timeout() {
            return RolecallError::Timeout {
                duration: self.timeout,
            };
        }
        RolecallError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }

    /// Sends a non-streaming request and returns the decoded response.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RolecallError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let response = self.send(&url, request).await?;

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        serde_json::from_str(&body).map_err(|e| RolecallError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming request and returns the stream of response frames.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream, RolecallError> {
        let url = format!("{}/models/{model}:streamGenerateContent?alt=sse", self.base_url);
        let response = self.send(&url, request).await?;
        Ok(sse::parse_sse_stream(response))
    }

    /// POST `request` to `url`, retrying transient statuses.
    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, RolecallError> {
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, url, "response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                attempt += 1;
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({status}): {}",
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(RolecallError::provider(message));
        }
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
