// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bare-greeting detection.
//!
//! A message that is nothing but a greeting gets a short canned reply
//! instead of a model call.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

/// Longest message (in characters, after trimming) still treated as a greeting.
pub const MAX_GREETING_CHARS: usize = 20;

/// Neutral replies to a bare greeting.
pub const GREETING_REPLIES: &[&str] = &[
    "Halo juga, ada apa ya?",
    "Halo, ada keperluan apa?",
    "Halo juga, bisa disampaikan maksudnya?",
    "Halo, ada yang ingin dibahas?",
];

static GREETING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^\s*(halo|hai|hi|helo|hello)\s*!?\s*$").unwrap(),
        Regex::new(r"^\s*(halo|hai|hi|helo|hello)\s+kak\b.*$").unwrap(),
        Regex::new(r"^\s*(ass?alamu?alaikum)(\s+wr\.?\s*wb\.?)?\s*$").unwrap(),
        Regex::new(r"^\s*(pagi|siang|sore|malam)\s*!?\s*$").unwrap(),
    ]
});

/// Returns true if `text` is only a greeting.
pub fn is_minimal_greeting(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    if normalized.chars().count() > MAX_GREETING_CHARS {
        return false;
    }
    GREETING_PATTERNS.iter().any(|re| re.is_match(&normalized))
}

/// Picks one of [`GREETING_REPLIES`].
pub fn greeting_reply<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    GREETING_REPLIES.choose(rng).copied().unwrap_or(GREETING_REPLIES[0])
}
