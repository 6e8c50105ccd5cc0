// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the rolecall configuration system.

use rolecall_config::diagnostic::ConfigError;
use rolecall_config::{load_and_validate_str, load_config_from_str};
use rolecall_core::{Audience, Segment};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_rolecall_config() {
    let toml = r#"
[agent]
name = "latihan"
log_level = "debug"

[gemini]
api_key = "test-key"
model = "gemini-2.0-flash"
fallback_models = ["gemini-1.5-flash"]
base_url = "http://localhost:8080/v1beta"
timeout_secs = 30
max_retries = 2

[generation]
dialog_temperature = 0.5
opener_temperature = 0.6
top_k = 20
safety_threshold = "BLOCK_ONLY_HIGH"

[persona]
audience = "Murid"
segment = "SD"

[display]
batch_chars = 80
min_interval_ms = 25

[storage]
enabled = false
database_path = "/tmp/chat.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "latihan");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
    assert_eq!(
        config.gemini.candidate_models(),
        vec!["gemini-2.0-flash", "gemini-1.5-flash"]
    );
    assert_eq!(config.gemini.max_retries, 2);
    assert_eq!(config.generation.top_k, 20);
    assert_eq!(config.generation.top_p, 0.9);
    assert_eq!(config.persona.audience, Audience::Student);
    assert_eq!(config.persona.segment, Segment::Sd);
    assert_eq!(config.display.batch_chars, 80);
    assert!(!config.storage.enabled);
    assert!(!config.storage.wal_mode);
}

/// Empty TOML yields full defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(
        config.gemini.candidate_models(),
        vec!["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"]
    );
    assert_eq!(config.display.min_interval_ms, 40);
    assert!(config.storage.enabled);
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[gemini]
modle = "gemini-2.0-flash"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "modle" && s == "model"
    )));
}

/// Unknown section is rejected at the top level.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown section");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telegram")));
}

/// A misspelled persona value is reported as an invalid variant.
#[test]
fn unknown_audience_is_reported() {
    let toml = r#"
[persona]
audience = "Guru"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject audience");
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownVariant { value, .. } if value == "Guru"
    ) || e.to_string().contains("Guru")));
}

/// Persona values load regardless of case, including aliases.
#[test]
fn persona_values_are_case_insensitive() {
    let cases = [
        ("Orang Tua", Audience::Parent),
        ("orang tua", Audience::Parent),
        ("Parent", Audience::Parent),
        ("orang-tua", Audience::Parent),
        ("ORANG-TUA", Audience::Parent),
        ("MURID", Audience::Student),
        ("Student", Audience::Student),
    ];
    for (value, expected) in cases {
        let toml = format!("[persona]\naudience = \"{value}\"\n");
        let config = load_config_from_str(&toml)
            .unwrap_or_else(|e| panic!("audience {value:?} should load: {e}"));
        assert_eq!(config.persona.audience, expected, "audience {value:?}");
    }

    for (value, expected) in [("Sma", Segment::Sma), ("sd", Segment::Sd), ("SMP", Segment::Smp)] {
        let toml = format!("[persona]\nsegment = \"{value}\"\n");
        let config = load_config_from_str(&toml)
            .unwrap_or_else(|e| panic!("segment {value:?} should load: {e}"));
        assert_eq!(config.persona.segment, expected, "segment {value:?}");
    }
}

/// Wrong value type is reported.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[display]
batch_chars = "many"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_runs_after_parse() {
    let toml = r#"
[generation]
top_p = 4.0
"#;

    let errors = load_and_validate_str(toml).expect_err("top_p out of range");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("top_p"))));
}
