// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rolecall.toml` > `~/.config/rolecall/rolecall.toml` >
//! `/etc/rolecall/rolecall.toml` with environment variable overrides via `ROLECALL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RolecallConfig;

/// Config sections addressable from `ROLECALL_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "gemini",
    "generation",
    "persona",
    "display",
    "storage",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rolecall/rolecall.toml` (system-wide)
/// 3. `~/.config/rolecall/rolecall.toml` (user XDG config)
/// 4. `./rolecall.toml` (local directory)
/// 5. `ROLECALL_*` environment variables
/// 6. `GEMINI_MODEL` for the primary model
pub fn load_config() -> Result<RolecallConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RolecallConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RolecallConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RolecallConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RolecallConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(model_env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RolecallConfig::default()))
        .merge(Toml::file("/etc/rolecall/rolecall.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rolecall/rolecall.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rolecall.toml"))
        .merge(env_provider())
        .merge(model_env_provider())
}

/// Map a lowercased, prefix-stripped env key onto its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `gemini_api_key` maps to `gemini.api_key`, not `gemini.api.key`.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because most keys
/// contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("ROLECALL_").map(|key| map_env_key(key.as_str()).into())
}

/// `GEMINI_MODEL`, honoured for compatibility with existing deployments.
fn model_env_provider() -> Env {
    Env::raw()
        .only(&["GEMINI_MODEL"])
        .map(|_| "gemini.model".into())
}
