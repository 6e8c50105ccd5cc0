// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the rolecall role-play simulator.
//!
//! This crate provides the trait definitions, error type and shared types
//! used throughout the workspace. The Gemini provider and the SQLite store
//! implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RolecallError;
pub use types::{
    AdapterType, Audience, ChatMessage, Conversation, ConversationSummary, GenerationParams,
    HarmCategory, HealthStatus, Intent, ProviderRequest, ProviderResponse, ProviderStreamChunk,
    Role, SafetySetting, Segment, TokenUsage,
};

pub use traits::{ConversationStore, PluginAdapter, ProviderAdapter, ProviderStream};
