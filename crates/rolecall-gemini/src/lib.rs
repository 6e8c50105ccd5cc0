// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for rolecall.
//!
//! Implements [`ProviderAdapter`] over the Gemini REST API with both
//! single-shot and SSE streaming generation. The model travels in each
//! request, so a single provider serves the whole fallback chain.

pub mod client;
pub mod sse;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use rolecall_config::RolecallConfig;
use rolecall_core::error::RolecallError;
use rolecall_core::traits::{PluginAdapter, ProviderAdapter, ProviderStream};
use rolecall_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, ProviderStreamChunk, TokenUsage,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, SafetySetting,
};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY", "GENAI_API_KEY"];

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: `gemini.api_key` in config, then
/// [`API_KEY_ENV_VARS`], then error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from the given configuration.
    pub fn new(config: &RolecallConfig) -> Result<Self, RolecallError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.gemini.base_url,
            Duration::from_secs(config.gemini.timeout_secs),
        )?
        .with_max_retries(config.gemini.max_retries);

        info!(
            model = config.gemini.model,
            fallbacks = ?config.gemini.fallback_models,
            "Gemini provider initialized"
        );

        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Converts a [`ProviderRequest`] into the Gemini wire format.
///
/// The whole prompt goes out as a single user turn.
fn to_api_request(request: &ProviderRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(Some("user"), request.prompt.clone())],
        system_instruction: request
            .system_instruction
            .as_ref()
            .map(|text| Content::text(None, text.clone())),
        generation_config: GenerationConfig {
            temperature: request.generation.temperature,
            top_p: request.generation.top_p,
            top_k: request.generation.top_k,
            max_output_tokens: request.generation.max_output_tokens,
            candidate_count: request.generation.candidate_count,
        },
        safety_settings: request
            .safety_settings
            .iter()
            .map(|s| SafetySetting {
                category: s.category.to_string(),
                threshold: s.threshold.clone(),
            })
            .collect(),
    }
}

fn usage_of(response: &GenerateContentResponse) -> Option<TokenUsage> {
    response.usage_metadata.as_ref().map(|u| TokenUsage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
    })
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RolecallError> {
        // No probe request: it would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RolecallError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, RolecallError> {
        let api_request = to_api_request(&request);
        let response = self
            .client
            .generate_content(&request.model, &api_request)
            .await?;

        Ok(ProviderResponse {
            text: response.text(),
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            finish_reason: response.finish_reason().map(str::to_string),
            block_reason: response.block_reason().map(str::to_string),
            usage: usage_of(&response),
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, RolecallError> {
        let api_request = to_api_request(&request);
        let frames = self
            .client
            .stream_generate_content(&request.model, &api_request)
            .await?;

        let chunks = frames.map(|frame| {
            frame.map(|response| {
                let text = response.text();
                ProviderStreamChunk {
                    text: (!text.is_empty()).then_some(text),
                    finish_reason: response.finish_reason().map(str::to_string),
                    usage: usage_of(&response),
                }
            })
        });

        Ok(Box::pin(chunks))
    }
}

/// Resolves the API key from config, then the process environment.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<String, RolecallError> {
    resolve_api_key_with(config_key, |name| std::env::var(name).ok())
}

/// Same as [`resolve_api_key`] with an injectable environment lookup.
fn resolve_api_key_with(
    config_key: &Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, RolecallError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| {
            RolecallError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or one of {}.",
                API_KEY_ENV_VARS.join(", ")
            ))
        })
}
