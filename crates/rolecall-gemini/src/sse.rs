// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for `streamGenerateContent?alt=sse`.
//!
//! Gemini sends unnamed events whose `data` is a complete
//! [`GenerateContentResponse`] holding only the newly generated text.
//! An `{"error": ...}` payload mid-stream becomes an `Err` item.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use rolecall_core::RolecallError;

use crate::types::{ApiErrorResponse, GenerateContentResponse};

/// Stream of decoded response frames.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, RolecallError>> + Send>>;

/// Parses a streaming HTTP response into decoded frames.
pub fn parse_sse_stream(response: reqwest::Response) -> ResponseStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => decode_frame(&event.data),
            Err(e) => Some(Err(RolecallError::Provider {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

/// Decode one `data:` payload. Blank payloads are skipped.
fn decode_frame(data: &str) -> Option<Result<GenerateContentResponse, RolecallError>> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            return Some(Err(RolecallError::Provider {
                message: format!("failed to parse stream frame: {e}"),
                source: Some(Box::new(e)),
            }));
        }
    };

    if value.get("error").is_some() {
        let message = serde_json::from_value::<ApiErrorResponse>(value)
            .map(|api_err| {
                format!(
                    "Gemini API error ({} {}): {}",
                    api_err.error.code, api_err.error.status, api_err.error.message
                )
            })
            .unwrap_or_else(|_| "Gemini API error in stream".to_string());
        return Some(Err(RolecallError::provider(message)));
    }

    Some(
        serde_json::from_value::<GenerateContentResponse>(value).map_err(|e| {
            RolecallError::Provider {
                message: format!("failed to decode stream frame: {e}"),
                source: Some(Box::new(e)),
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serve raw SSE text through wiremock to get a real `reqwest::Response`.
    async fn mock_sse_response(sse_text: &str) -> reqwest::Response {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;

        reqwest::get(&server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn parses_text_frames_in_order() {
        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Anak saya \"}],\"role\":\"model\"}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"kelas 8.\"}],\"role\":\"model\"},\"finishReason\":\"STOP\"}]}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let frames: Vec<_> = parse_sse_stream(response).collect().await;

        assert_eq!(frames.len(), 2);
        let first = frames[0].as_ref().unwrap();
        assert_eq!(first.text(), "Anak saya ");
        let second = frames[1].as_ref().unwrap();
        assert_eq!(second.text(), "kelas 8.");
        assert_eq!(second.finish_reason(), Some("STOP"));
    }

    #[tokio::test]
    async fn error_payload_becomes_err_item() {
        let sse = "data: {\"error\":{\"code\":503,\"message\":\"overloaded\",\"status\":\"UNAVAILABLE\"}}\n\n";
        let response = mock_sse_response(sse).await;
        let frames: Vec<_> = parse_sse_stream(response).collect().await;

        assert_eq!(frames.len(), 1);
        let err = frames[0].as_ref().unwrap_err().to_string();
        assert!(err.contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_frame_is_error() {
        let sse = "data: {not json}\n\n";
        let response = mock_sse_response(sse).await;
        let frames: Vec<_> = parse_sse_stream(response).collect().await;
        assert!(frames[0].is_err());
    }

    #[test]
    fn blank_frame_is_skipped() {
        assert!(decode_frame("  ").is_none());
    }
}
