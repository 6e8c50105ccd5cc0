// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona layer for rolecall.
//!
//! Everything the model is told about who it plays: the role template,
//! per-segment rules, opener scenarios, history windowing and the final
//! prompt layout. Also the greeting shortcut and the product catalog shown
//! to the salesperson.

pub mod catalog;
pub mod greeting;
pub mod history;
pub mod prompt;
pub mod scenario;
pub mod system;

pub use catalog::{CatalogItem, Recommendation, Signals, catalog, recommend};
pub use greeting::{GREETING_REPLIES, greeting_reply, is_minimal_greeting};
pub use history::{history_lines, history_window};
pub use prompt::{PromptTask, build_prompt};
pub use scenario::{DEFAULT_SCENARIO, sample_scenario, scenarios};
pub use system::{STOP_PHRASES, dialog_instruction, opener_instruction, segment_rule, system_prompt};
