// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks ranges and non-empty constraints that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{RolecallConfig, SAFETY_THRESHOLDS};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RolecallConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.gemini.candidate_models().is_empty() {
        fail("gemini.model must not be empty when gemini.fallback_models is empty".to_string());
    }

    let base_url = config.gemini.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "gemini.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    let generation = &config.generation;
    for (key, value) in [
        ("dialog_temperature", generation.dialog_temperature),
        ("opener_temperature", generation.opener_temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            fail(format!(
                "generation.{key} must be between 0.0 and 2.0, got {value}"
            ));
        }
    }

    if !(0.0..=1.0).contains(&generation.top_p) {
        fail(format!(
            "generation.top_p must be between 0.0 and 1.0, got {}",
            generation.top_p
        ));
    }

    if generation.max_output_tokens == 0 {
        fail("generation.max_output_tokens must be at least 1".to_string());
    }

    if generation.candidate_count == 0 {
        fail("generation.candidate_count must be at least 1".to_string());
    }

    if !SAFETY_THRESHOLDS.contains(&generation.safety_threshold.as_str()) {
        fail(format!(
            "generation.safety_threshold `{}` is not one of {}",
            generation.safety_threshold,
            SAFETY_THRESHOLDS.join(", ")
        ));
    }

    if config.display.batch_chars == 0 {
        fail("display.batch_chars must be at least 1".to_string());
    }

    if config.storage.enabled && config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty when storage is enabled".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
