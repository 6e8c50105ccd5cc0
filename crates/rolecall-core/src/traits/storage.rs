// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for conversation persistence.

use async_trait::async_trait;

use crate::error::RolecallError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Conversation, ConversationSummary};

/// Adapter for conversation persistence backends.
///
/// Conversations are stored one record per id. Saving an id that already
/// exists replaces its title, persona and messages but keeps `created_at`.
#[async_trait]
pub trait ConversationStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), RolecallError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), RolecallError>;

    /// Inserts or replaces the conversation with `conversation.id`.
    async fn save_conversation(&self, conversation: &Conversation) -> Result<(), RolecallError>;

    /// Loads a conversation by id, or `None` if it does not exist.
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, RolecallError>;

    /// Lists conversations, most recently updated first.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, RolecallError>;

    /// Deletes a conversation. Returns `true` if a row was removed.
    async fn delete_conversation(&self, id: &str) -> Result<bool, RolecallError>;
}
