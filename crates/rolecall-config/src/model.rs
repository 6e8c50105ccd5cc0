// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the rolecall simulator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use rolecall_core::{Audience, GenerationParams, SafetySetting, Segment};
use serde::{Deserialize, Serialize};

/// Top-level rolecall configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RolecallConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini API settings and model fallback chain.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Sampling and safety parameters sent with each request.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Default persona for new sessions.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Streaming display batching.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Conversation persistence.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the shell banner.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "RG Telesales Role-Play".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to `GOOGLE_API_KEY`, `GEMINI_API_KEY`, `GENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Primary model, tried first. Also settable through `GEMINI_MODEL`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Models tried, in order, after the primary one fails or returns nothing.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,

    /// API root, up to and including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on 429/500/503 before the request counts as failed.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            fallback_models: default_fallback_models(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl GeminiConfig {
    /// Primary model followed by the fallbacks, blanks and duplicates removed.
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::new();
        for model in std::iter::once(&self.model).chain(self.fallback_models.iter()) {
            let model = model.trim();
            if !model.is_empty() && !models.iter().any(|m| m == model) {
                models.push(model.to_string());
            }
        }
        models
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_fallback_models() -> Vec<String> {
    vec!["gemini-2.0-flash".to_string(), "gemini-1.5-flash".to_string()]
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Safety thresholds accepted by the generation API.
pub const SAFETY_THRESHOLDS: &[&str] = &[
    "BLOCK_NONE",
    "BLOCK_ONLY_HIGH",
    "BLOCK_MEDIUM_AND_ABOVE",
    "BLOCK_LOW_AND_ABOVE",
];

/// Sampling and safety configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Temperature for regular replies.
    #[serde(default = "default_dialog_temperature")]
    pub dialog_temperature: f32,

    /// Temperature for the customer's opening message.
    #[serde(default = "default_opener_temperature")]
    pub opener_temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_candidate_count")]
    pub candidate_count: u32,

    /// Threshold applied to every harm category.
    #[serde(default = "default_safety_threshold")]
    pub safety_threshold: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            dialog_temperature: default_dialog_temperature(),
            opener_temperature: default_opener_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            candidate_count: default_candidate_count(),
            safety_threshold: default_safety_threshold(),
        }
    }
}

impl GenerationConfig {
    /// Sampling parameters for one request.
    pub fn params(&self, opener: bool) -> GenerationParams {
        GenerationParams {
            temperature: if opener {
                self.opener_temperature
            } else {
                self.dialog_temperature
            },
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
            candidate_count: self.candidate_count,
        }
    }

    pub fn safety_settings(&self) -> Vec<SafetySetting> {
        SafetySetting::uniform(&self.safety_threshold)
    }
}

fn default_dialog_temperature() -> f32 {
    0.3
}

fn default_opener_temperature() -> f32 {
    0.35
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    256
}

fn default_candidate_count() -> u32 {
    1
}

fn default_safety_threshold() -> String {
    "BLOCK_MEDIUM_AND_ABOVE".to_string()
}

/// Persona selected when a session starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaConfig {
    #[serde(default = "default_audience")]
    pub audience: Audience,

    #[serde(default = "default_segment")]
    pub segment: Segment,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            audience: default_audience(),
            segment: default_segment(),
        }
    }
}

fn default_audience() -> Audience {
    Audience::Parent
}

fn default_segment() -> Segment {
    Segment::Smp
}

/// Streaming display batching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Flush once this many characters are pending.
    #[serde(default = "default_batch_chars")]
    pub batch_chars: usize,

    /// Flush once this many milliseconds have passed since the last flush.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            batch_chars: default_batch_chars(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_batch_chars() -> usize {
    160
}

fn default_min_interval_ms() -> u64 {
    40
}

/// Conversation persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Mirror conversations to SQLite. When off, history lives only in memory.
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_storage_enabled() -> bool {
    true
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("rolecall").join("chat_history.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("chat_history.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
