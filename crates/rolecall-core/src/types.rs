// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the persona, provider, storage and agent crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Persona types ---

/// Who the simulated customer is.
///
/// Serialized as its display label; parsed case-insensitively from the
/// label or an alias (`parent`, `orang-tua`, `student`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Audience {
    #[strum(to_string = "Orang Tua", serialize = "parent", serialize = "orang-tua")]
    Parent,
    #[strum(to_string = "Murid", serialize = "student")]
    Student,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Parent, Audience::Student];

    const ACCEPTED: &'static [&'static str] =
        &["Orang Tua", "parent", "orang-tua", "Murid", "student"];
}

/// School level of the simulated customer (or their child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Segment {
    #[strum(to_string = "SD")]
    Sd,
    #[strum(to_string = "SMP")]
    Smp,
    #[strum(to_string = "SMA")]
    Sma,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Sd, Segment::Smp, Segment::Sma];

    const ACCEPTED: &'static [&'static str] = &["SD", "SMP", "SMA"];
}

/// Serde through `Display`/`FromStr`, so config files, env vars and stored
/// rows accept the same spellings as the shell.
macro_rules! serde_via_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value
                    .trim()
                    .parse()
                    .map_err(|_| serde::de::Error::unknown_variant(&value, <$ty>::ACCEPTED))
            }
        }
    };
}

serde_via_str!(Audience);
serde_via_str!(Segment);

/// What the next model turn is meant to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Regular reply to the salesperson's last message.
    #[default]
    Dialog,
    /// First customer message seeded by a synthetic trigger.
    Opener,
}

// --- Conversation types ---

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Set on opener triggers. Synthetic messages steer the model but are
    /// never shown, persisted or exported.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            synthetic: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            synthetic: false,
        }
    }

    /// A synthetic user message used to seed an opener turn.
    pub fn trigger(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            synthetic: true,
        }
    }
}

/// A persisted conversation with its full message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub audience: Audience,
    pub segment: Segment,
    /// Local ISO-8601 timestamp, second precision.
    pub created_at: String,
    pub updated_at: String,
    pub messages: Vec<ChatMessage>,
}

/// Listing entry for a persisted conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub audience: Audience,
    pub segment: Segment,
    pub created_at: String,
    pub updated_at: String,
}

// --- Provider types ---

/// Content-safety category understood by the generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum HarmCategory {
    #[strum(to_string = "HARM_CATEGORY_HARASSMENT")]
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[strum(to_string = "HARM_CATEGORY_HATE_SPEECH")]
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[strum(to_string = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[strum(to_string = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// Blocking threshold for one harm category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: String,
}

impl SafetySetting {
    /// One setting per harm category, all at `threshold`.
    pub fn uniform(threshold: &str) -> Vec<SafetySetting> {
        HarmCategory::ALL
            .iter()
            .map(|category| SafetySetting {
                category: *category,
                threshold: threshold.to_string(),
            })
            .collect()
    }
}

/// Sampling parameters for a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 256,
            candidate_count: 1,
        }
    }
}

/// A request to a text-generation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Fully assembled prompt text, sent as a single user turn.
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub generation: GenerationParams,
    pub safety_settings: Vec<SafetySetting>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete (non-streaming) provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Concatenated text of every candidate part. May be empty.
    pub text: String,
    pub model: String,
    /// Finish reason of the first candidate, e.g. `STOP` or `MAX_TOKENS`.
    pub finish_reason: Option<String>,
    /// Set when the prompt itself was rejected by the safety filter.
    pub block_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// A single chunk from a streaming provider response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderStreamChunk {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}
