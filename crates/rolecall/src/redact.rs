// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for printed configuration and error messages.

use std::sync::LazyLock;

use regex::Regex;
use rolecall_config::RolecallConfig;

static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Google API keys: AIza...
        Regex::new(r"AIza[0-9A-Za-z_\-]{35}").unwrap(),
        // x-goog-api-key header echoed in errors
        Regex::new(r"(?i)x-goog-api-key[:=]\s*\S+").unwrap(),
    ]
});

const REDACTED: &str = "[REDACTED]";

/// Replaces known key formats and the given exact values with `[REDACTED]`.
pub fn redact(input: &str, secrets: &[&str]) -> String {
    let mut result = input.to_string();
    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).to_string();
    }
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        result = result.replace(secret, REDACTED);
    }
    result
}

/// Copy of `config` safe to print.
pub fn masked_config(config: &RolecallConfig) -> RolecallConfig {
    let mut masked = config.clone();
    if masked.gemini.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        masked.gemini.api_key = Some(REDACTED.to_string());
    }
    masked
}
