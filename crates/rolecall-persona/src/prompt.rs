// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly.
//!
//! A prompt is five tagged sections: `[META]` (one line of JSON),
//! `[SYSTEM]`, `[HISTORY]`, `[TASK]` and a trailing `[RESPON]` marker the
//! model continues from.

use chrono::{DateTime, Local};
use rolecall_core::{Audience, ChatMessage, Intent, Segment};
use serde::Serialize;

use crate::history::{history_lines, history_window};
use crate::system::{dialog_instruction, opener_instruction, system_prompt};

/// What the next turn should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTask<'a> {
    Dialog,
    Opener { scenario: &'a str },
}

impl PromptTask<'_> {
    pub fn intent(&self) -> Intent {
        match self {
            PromptTask::Dialog => Intent::Dialog,
            PromptTask::Opener { .. } => Intent::Opener,
        }
    }
}

#[derive(Debug, Serialize)]
struct PromptPolicy {
    no_pitch: bool,
    no_product_names: bool,
    focus_persona: bool,
}

#[derive(Debug, Serialize)]
struct PromptMeta {
    audience: String,
    segment: String,
    time: String,
    policy: PromptPolicy,
    mode: Intent,
    nonce: i64,
}

/// Builds the full prompt for `task`.
///
/// `now` stamps the `time` and `nonce` meta fields; the nonce keeps two
/// otherwise identical prompts distinct.
pub fn build_prompt(
    messages: &[ChatMessage],
    audience: Audience,
    segment: Segment,
    task: PromptTask<'_>,
    now: DateTime<Local>,
) -> String {
    let intent = task.intent();
    let meta = PromptMeta {
        audience: audience.to_string(),
        segment: segment.to_string(),
        time: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        policy: PromptPolicy {
            no_pitch: true,
            no_product_names: true,
            focus_persona: true,
        },
        mode: intent,
        nonce: now.timestamp_millis(),
    };
    // Plain strings and bools only.
    let meta_json = serde_json::to_string(&meta).unwrap_or_default();

    let history = history_lines(messages, history_window(messages.len(), intent)).join("\n");
    let instruction = match task {
        PromptTask::Dialog => dialog_instruction(audience, segment),
        PromptTask::Opener { scenario } => opener_instruction(audience, segment, scenario),
    };

    format!(
        "[META]\n{meta_json}\n\n[SYSTEM]\n{}\n\n[HISTORY]\n{history}\n\n[TASK]\n{instruction}\n\n[RESPON]",
        system_prompt(audience, segment)
    )
}
