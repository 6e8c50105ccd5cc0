// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation across a list of candidate models.
//!
//! Every candidate is first tried with streaming. If none produces text,
//! every candidate is tried again without streaming. If that fails too the
//! reply is a fixed diagnostic sentence, so generation always yields text.

use futures::StreamExt;
use rolecall_core::{ProviderAdapter, ProviderRequest, ProviderResponse, RolecallError};
use tracing::{debug, info, warn};

use crate::batcher::{BatchPolicy, DisplayBatcher, DisplaySink};

const NO_TEXT: &str = "Model tidak mengembalikan teks.";
const NO_TEXT_HINT: &str = "Coba ganti model/parameter.";

/// How a reply was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Streamed,
    Completed,
    Diagnostic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub source: ReplySource,
    /// Model that produced the text, `None` for the diagnostic.
    pub model: Option<String>,
}

/// Text of a non-streamed response.
///
/// Empty output is explained by the finish reason when it is not `STOP`,
/// then by the prompt block reason. Otherwise the result is empty.
pub fn extract_text(response: &ProviderResponse) -> String {
    let text = response.text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    if let Some(reason) = non_stop_reason(response) {
        return format!("Tidak ada keluaran karena finish_reason={reason}");
    }
    if let Some(reason) = response.block_reason.as_deref().filter(|r| !r.is_empty()) {
        return format!("Tidak ada keluaran karena diblokir kebijakan: {reason}");
    }
    String::new()
}

/// The diagnostic reply used when no candidate produced text.
pub fn no_text_message(last_reason: Option<&str>) -> String {
    format!("{NO_TEXT} {}", last_reason.unwrap_or(NO_TEXT_HINT))
}

fn non_stop_reason(response: &ProviderResponse) -> Option<&str> {
    response
        .finish_reason
        .as_deref()
        .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("STOP"))
}

/// Generates a reply, trying `models` in order.
///
/// `template.model` is ignored; each attempt sets its own. Streamed text is
/// shown through `sink` as it arrives, and any other final text is rendered
/// once at the end.
pub async fn generate_with_fallback(
    provider: &dyn ProviderAdapter,
    models: &[String],
    template: &ProviderRequest,
    policy: BatchPolicy,
    sink: &mut dyn DisplaySink,
) -> Generated {
    for model in models {
        let request = ProviderRequest {
            model: model.clone(),
            ..template.clone()
        };
        match stream_attempt(provider, request, policy, sink).await {
            Ok(text) if !text.is_empty() => {
                info!(model = %model, chars = text.chars().count(), "streamed reply");
                return Generated {
                    text,
                    source: ReplySource::Streamed,
                    model: Some(model.clone()),
                };
            }
            Ok(_) => debug!(model = %model, "stream produced no text"),
            Err(e) => warn!(model = %model, error = %e, "streaming attempt failed"),
        }
    }

    let mut last_reason: Option<String> = None;
    for model in models {
        let request = ProviderRequest {
            model: model.clone(),
            ..template.clone()
        };
        match provider.complete(request).await {
            Ok(response) => {
                let text = extract_text(&response);
                if !text.is_empty() {
                    info!(model = %model, "completed reply without streaming");
                    sink.render(&text);
                    return Generated {
                        text,
                        source: ReplySource::Completed,
                        model: Some(model.clone()),
                    };
                }
                if let Some(reason) = non_stop_reason(&response) {
                    last_reason = Some(format!("finish_reason={reason}"));
                }
                debug!(model = %model, "completion produced no text");
            }
            Err(e) => {
                warn!(model = %model, error = %e, "completion attempt failed");
                last_reason = Some(e.to_string());
            }
        }
    }

    let text = no_text_message(last_reason.as_deref());
    warn!(candidates = models.len(), "no candidate model produced text");
    sink.render(&text);
    Generated {
        text,
        source: ReplySource::Diagnostic,
        model: None,
    }
}

/// One streaming attempt. Shown text is abandoned unless the attempt
/// yields a non-empty reply.
async fn stream_attempt(
    provider: &dyn ProviderAdapter,
    request: ProviderRequest,
    policy: BatchPolicy,
    sink: &mut dyn DisplaySink,
) -> Result<String, RolecallError> {
    let mut stream = provider.stream(request).await?;
    let mut batcher = DisplayBatcher::new(sink, policy);

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                if let Some(text) = chunk.text.as_deref() {
                    batcher.push(text);
                }
            }
            Err(e) => {
                batcher.abandon();
                return Err(e);
            }
        }
    }

    let flushed = batcher.flushes() > 0;
    let text = batcher.finish();
    if text.is_empty() && flushed {
        sink.abandon();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolecall_core::{GenerationParams, SafetySetting};
    use rolecall_test_utils::{MockProvider, Script};

    #[derive(Default)]
    struct Recorder {
        renders: Vec<String>,
        abandoned: usize,
    }

    impl DisplaySink for Recorder {
        fn render(&mut self, text: &str) {
            self.renders.push(text.to_string());
        }
        fn complete(&mut self) {}
        fn abandon(&mut self) {
            self.abandoned += 1;
        }
    }

    fn template() -> ProviderRequest {
        ProviderRequest {
            model: String::new(),
            prompt: "[RESPON]".into(),
            system_instruction: None,
            generation: GenerationParams::default(),
            safety_settings: SafetySetting::uniform("BLOCK_MEDIUM_AND_ABOVE"),
        }
    }

    fn models() -> Vec<String> {
        vec!["m1".into(), "m2".into(), "m3".into()]
    }

    #[test]
    fn extraction_order() {
        let mut response = ProviderResponse {
            text: "  halo  ".into(),
            model: "m".into(),
            finish_reason: Some("MAX_TOKENS".into()),
            block_reason: Some("SAFETY".into()),
            usage: None,
        };
        assert_eq!(extract_text(&response), "halo");

        response.text = String::new();
        assert_eq!(
            extract_text(&response),
            "Tidak ada keluaran karena finish_reason=MAX_TOKENS"
        );

        response.finish_reason = Some("STOP".into());
        assert_eq!(
            extract_text(&response),
            "Tidak ada keluaran karena diblokir kebijakan: SAFETY"
        );

        response.block_reason = None;
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn diagnostic_wording() {
        assert_eq!(
            no_text_message(None),
            "Model tidak mengembalikan teks. Coba ganti model/parameter."
        );
        assert_eq!(
            no_text_message(Some("finish_reason=SAFETY")),
            "Model tidak mengembalikan teks. finish_reason=SAFETY"
        );
    }

    #[tokio::test]
    async fn first_streaming_model_wins() {
        let provider = MockProvider::new()
            .script("m1", Script::chunks(["Iya, ", "saya ibunya."]));
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;
        assert_eq!(out.text, "Iya, saya ibunya.");
        assert_eq!(out.source, ReplySource::Streamed);
        assert_eq!(out.model.as_deref(), Some("m1"));
        assert_eq!(sink.renders.last().map(String::as_str), Some("Iya, saya ibunya."));
        assert_eq!(provider.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn stream_failure_moves_to_next_model() {
        let provider = MockProvider::new()
            .script("m1", Script::fail("quota exceeded"))
            .script("m2", Script::stream_fails_after(["separuh "], "connection reset"))
            .script("m3", Script::text("Dari m3."));
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;
        assert_eq!(out.text, "Dari m3.");
        assert_eq!(out.model.as_deref(), Some("m3"));
        assert!(sink.abandoned >= 1);
        let streamed: Vec<_> = provider
            .calls()
            .await
            .into_iter()
            .map(|c| c.model)
            .collect();
        assert_eq!(streamed, vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn falls_back_to_completion_after_empty_streams() {
        let provider = MockProvider::new()
            .script("m1", Script::empty())
            .script("m2", Script::completion_only("Jawaban utuh."))
            .script("m3", Script::empty());
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;
        assert_eq!(out.text, "Jawaban utuh.");
        assert_eq!(out.source, ReplySource::Completed);
        assert_eq!(sink.renders, vec!["Jawaban utuh."]);
    }

    #[tokio::test]
    async fn finish_reason_is_reported_as_reply() {
        let provider = MockProvider::new()
            .script("m1", Script::finish_reason("SAFETY"))
            .script("m2", Script::fail("boom"))
            .script("m3", Script::fail("boom"));
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;
        assert_eq!(out.text, "Tidak ada keluaran karena finish_reason=SAFETY");
        assert_eq!(out.source, ReplySource::Completed);
    }

    #[tokio::test]
    async fn every_candidate_tried_twice_then_diagnostic() {
        let provider = MockProvider::new()
            .script("m1", Script::empty())
            .script("m2", Script::fail("503 Service Unavailable"))
            .script("m3", Script::empty());
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;

        assert_eq!(out.source, ReplySource::Diagnostic);
        assert_eq!(
            out.text,
            "Model tidak mengembalikan teks. provider error: 503 Service Unavailable"
        );
        let calls = provider.calls().await;
        assert_eq!(calls.len(), 6);
        assert!(calls[..3].iter().all(|c| c.streaming));
        assert!(calls[3..].iter().all(|c| !c.streaming));
        assert_eq!(sink.renders.last(), Some(&out.text));
    }

    #[tokio::test]
    async fn all_empty_uses_hint() {
        let provider = MockProvider::new()
            .script("m1", Script::empty())
            .script("m2", Script::empty())
            .script("m3", Script::empty());
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &models(), &template(), BatchPolicy::default(), &mut sink)
                .await;
        assert_eq!(
            out.text,
            "Model tidak mengembalikan teks. Coba ganti model/parameter."
        );
    }

    #[tokio::test]
    async fn no_candidates_yields_diagnostic() {
        let provider = MockProvider::new();
        let mut sink = Recorder::default();
        let out =
            generate_with_fallback(&provider, &[], &template(), BatchPolicy::default(), &mut sink).await;
        assert_eq!(out.source, ReplySource::Diagnostic);
        assert!(provider.calls().await.is_empty());
    }
}
