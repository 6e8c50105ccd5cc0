// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rolecall history` and `rolecall export` command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use rolecall_agent::{TRANSCRIPT_FILE_NAME, to_markdown_transcript};
use rolecall_config::RolecallConfig;
use rolecall_core::{ConversationStore, ConversationSummary, RolecallError};
use rolecall_storage::SqliteStorage;
use tracing::info;

/// Opens the conversation store, or `None` when history is disabled.
pub async fn open_store(
    config: &RolecallConfig,
) -> Result<Option<Arc<SqliteStorage>>, RolecallError> {
    if !config.storage.enabled {
        info!("conversation history disabled by configuration");
        return Ok(None);
    }
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Some(Arc::new(storage)))
}

async fn require_store(config: &RolecallConfig) -> Result<Arc<SqliteStorage>, RolecallError> {
    open_store(config).await?.ok_or_else(|| {
        RolecallError::Config("conversation history is disabled (storage.enabled = false)".into())
    })
}

/// One-line listing entry: title, persona and last update.
pub fn history_label(summary: &ConversationSummary) -> String {
    let title: String = summary.title.chars().take(40).collect();
    let updated: String = summary.updated_at.chars().skip(5).take(11).collect();
    format!(
        "{title} · {}-{} · {updated}",
        summary.audience, summary.segment
    )
}

/// Prints a numbered listing; numbers are 1-based.
pub fn print_listing(summaries: &[ConversationSummary]) {
    if summaries.is_empty() {
        println!("{}", "no saved conversations".dimmed());
        return;
    }
    for (i, summary) in summaries.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            i + 1,
            history_label(summary),
            summary.id.dimmed()
        );
    }
}

/// Resolves `n|id` against the last listing.
pub fn resolve_ref(reference: &str, listing: &[ConversationSummary]) -> String {
    reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| listing.get(i))
        .map(|s| s.id.clone())
        .unwrap_or_else(|| reference.to_string())
}

pub async fn run_list(config: &RolecallConfig) -> Result<(), RolecallError> {
    let store = require_store(config).await?;
    print_listing(&store.list_conversations().await?);
    store.close().await
}

pub async fn run_show(config: &RolecallConfig, id: &str) -> Result<(), RolecallError> {
    let store = require_store(config).await?;
    let conversation = store
        .get_conversation(id)
        .await?
        .ok_or_else(|| RolecallError::ConversationNotFound { id: id.to_string() })?;
    println!("{}", to_markdown_transcript(&conversation.messages));
    store.close().await
}

pub async fn run_delete(config: &RolecallConfig, id: &str) -> Result<(), RolecallError> {
    let store = require_store(config).await?;
    if store.delete_conversation(id).await? {
        println!("deleted {id}");
    } else {
        return Err(RolecallError::ConversationNotFound { id: id.to_string() });
    }
    store.close().await
}

pub async fn run_export(
    config: &RolecallConfig,
    id: &str,
    output: Option<PathBuf>,
) -> Result<(), RolecallError> {
    let store = require_store(config).await?;
    let conversation = store
        .get_conversation(id)
        .await?
        .ok_or_else(|| RolecallError::ConversationNotFound { id: id.to_string() })?;
    let path = output.unwrap_or_else(|| PathBuf::from(TRANSCRIPT_FILE_NAME));
    write_transcript(&path, &to_markdown_transcript(&conversation.messages))?;
    println!("transcript written to {}", path.display());
    store.close().await
}

pub fn write_transcript(path: &Path, markdown: &str) -> Result<(), RolecallError> {
    std::fs::write(path, markdown).map_err(|e| RolecallError::Internal(format!(
        "failed to write transcript to {}: {e}",
        path.display()
    )))
}
