// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-play session management for rolecall.
//!
//! [`RoleplayEngine`] ties a [`ChatSession`] to the model provider and the
//! conversation store:
//! - builds persona prompts for dialog and opener turns
//! - generates replies with model fallback and throttled display
//! - autosaves after every change

pub mod batcher;
pub mod engine;
pub mod fallback;
pub mod session;
pub mod transcript;

pub use batcher::{BatchPolicy, DisplayBatcher, DisplaySink, NullSink};
pub use engine::{Reply, RoleplayEngine};
pub use fallback::{Generated, ReplySource, extract_text, generate_with_fallback, no_text_message};
pub use session::{ChatSession, OPENER_TRIGGER, derive_title};
pub use transcript::{TRANSCRIPT_FILE_NAME, to_markdown_transcript};
