// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with a script per model name,
//! so fallback behaviour can be driven model by model. Models without a
//! script answer from a FIFO queue, then with "mock response".

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use rolecall_core::traits::{PluginAdapter, ProviderAdapter, ProviderStream};
use rolecall_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, ProviderStreamChunk, TokenUsage,
};
use rolecall_core::RolecallError;

/// How a scripted model behaves on `stream` and `complete`.
#[derive(Debug, Clone)]
pub struct Script {
    stream: StreamScript,
    complete: CompleteScript,
}

#[derive(Debug, Clone)]
enum StreamScript {
    Chunks(Vec<String>),
    ChunksThenError(Vec<String>, String),
    FinishOnly(String),
    Error(String),
}

#[derive(Debug, Clone)]
enum CompleteScript {
    Text(String),
    FinishReason(String),
    Blocked(String),
    Error(String),
}

impl Script {
    /// Streams `text` as one chunk; completes with it too.
    pub fn text(text: &str) -> Self {
        Self::chunks([text])
    }

    /// Streams each piece as a chunk; completes with them joined.
    pub fn chunks<const N: usize>(pieces: [&str; N]) -> Self {
        let pieces: Vec<String> = pieces.iter().map(|p| p.to_string()).collect();
        Self {
            complete: CompleteScript::Text(pieces.concat()),
            stream: StreamScript::Chunks(pieces),
        }
    }

    /// No text anywhere; finish reason `STOP`.
    pub fn empty() -> Self {
        Self {
            stream: StreamScript::FinishOnly("STOP".into()),
            complete: CompleteScript::FinishReason("STOP".into()),
        }
    }

    /// Both calls fail with a provider error.
    pub fn fail(message: &str) -> Self {
        Self {
            stream: StreamScript::Error(message.into()),
            complete: CompleteScript::Error(message.into()),
        }
    }

    /// Streams `pieces` then fails; completes with the pieces joined.
    pub fn stream_fails_after<const N: usize>(pieces: [&str; N], message: &str) -> Self {
        let pieces: Vec<String> = pieces.iter().map(|p| p.to_string()).collect();
        Self {
            complete: CompleteScript::Text(pieces.concat()),
            stream: StreamScript::ChunksThenError(pieces, message.into()),
        }
    }

    /// Empty stream; completion returns `text`.
    pub fn completion_only(text: &str) -> Self {
        Self {
            stream: StreamScript::Chunks(Vec::new()),
            complete: CompleteScript::Text(text.into()),
        }
    }

    /// No text; finish reason `reason` on both calls.
    pub fn finish_reason(reason: &str) -> Self {
        Self {
            stream: StreamScript::FinishOnly(reason.into()),
            complete: CompleteScript::FinishReason(reason.into()),
        }
    }

    /// No text; the prompt is reported as blocked for `reason`.
    pub fn blocked(reason: &str) -> Self {
        Self {
            stream: StreamScript::Chunks(Vec::new()),
            complete: CompleteScript::Blocked(reason.into()),
        }
    }
}

/// One call seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub streaming: bool,
    pub request: ProviderRequest,
}

/// A mock provider with per-model scripts and a call log.
#[derive(Default)]
pub struct MockProvider {
    scripts: HashMap<String, Script>,
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unscripted models answer with these, in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::default()
        }
    }

    /// Sets the behaviour of `model`.
    pub fn script(mut self, model: &str, script: Script) -> Self {
        self.scripts.insert(model.to_string(), script);
        self
    }

    /// Every call so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, request: &ProviderRequest, streaming: bool) {
        self.calls.lock().await.push(RecordedCall {
            model: request.model.clone(),
            streaming,
            request: request.clone(),
        });
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

fn usage() -> Option<TokenUsage> {
    Some(TokenUsage {
        input_tokens: 10,
        output_tokens: 20,
    })
}

fn text_chunk(text: String) -> Result<ProviderStreamChunk, RolecallError> {
    Ok(ProviderStreamChunk {
        text: Some(text),
        ..ProviderStreamChunk::default()
    })
}

fn finish_chunk(reason: String) -> Result<ProviderStreamChunk, RolecallError> {
    Ok(ProviderStreamChunk {
        text: None,
        finish_reason: Some(reason),
        usage: usage(),
    })
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RolecallError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RolecallError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, RolecallError> {
        self.record(&request, false).await;

        let script = match self.scripts.get(&request.model) {
            Some(script) => script.complete.clone(),
            None => CompleteScript::Text(self.next_response().await),
        };

        let mut response = ProviderResponse {
            text: String::new(),
            model: request.model,
            finish_reason: Some("STOP".to_string()),
            block_reason: None,
            usage: usage(),
        };
        match script {
            CompleteScript::Text(text) => response.text = text,
            CompleteScript::FinishReason(reason) => response.finish_reason = Some(reason),
            CompleteScript::Blocked(reason) => {
                response.finish_reason = None;
                response.block_reason = Some(reason);
            }
            CompleteScript::Error(message) => return Err(RolecallError::provider(message)),
        }
        Ok(response)
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, RolecallError> {
        self.record(&request, true).await;

        let script = match self.scripts.get(&request.model) {
            Some(script) => script.stream.clone(),
            None => StreamScript::Chunks(vec![self.next_response().await]),
        };

        let items: Vec<Result<ProviderStreamChunk, RolecallError>> = match script {
            StreamScript::Error(message) => return Err(RolecallError::provider(message)),
            StreamScript::Chunks(pieces) => pieces
                .into_iter()
                .map(text_chunk)
                .chain(std::iter::once(finish_chunk("STOP".into())))
                .collect(),
            StreamScript::ChunksThenError(pieces, message) => pieces
                .into_iter()
                .map(text_chunk)
                .chain(std::iter::once(Err(RolecallError::provider(message))))
                .collect(),
            StreamScript::FinishOnly(reason) => vec![finish_chunk(reason)],
        };

        Ok(Box::pin(stream::iter(items)))
    }
}
