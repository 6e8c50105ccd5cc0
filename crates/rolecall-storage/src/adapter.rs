// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ConversationStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use rolecall_config::model::StorageConfig;
use rolecall_core::{
    AdapterType, ConversationStore, HealthStatus, PluginAdapter, RolecallError,
};

use crate::database::Database;
use crate::models::{Conversation, ConversationSummary};
use crate::queries;

/// SQLite-backed conversation store.
///
/// The database is opened on the first call to
/// [`ConversationStore::initialize`]; every other operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new store; the database file is not touched yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, RolecallError> {
        self.db.get().ok_or_else(|| RolecallError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RolecallError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RolecallError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), RolecallError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| RolecallError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), RolecallError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn save_conversation(&self, conversation: &Conversation) -> Result<(), RolecallError> {
        queries::conversations::upsert_conversation(self.db()?, conversation).await
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, RolecallError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, RolecallError> {
        queries::conversations::list_conversations(self.db()?).await
    }

    async fn delete_conversation(&self, id: &str) -> Result<bool, RolecallError> {
        queries::conversations::delete_conversation(self.db()?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolecall_core::{Audience, ChatMessage, Segment};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            enabled: true,
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        assert!(storage.list_conversations().await.is_err());
    }

    #[tokio::test]
    async fn conversation_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);

        let mut convo = Conversation {
            id: "abc123".to_string(),
            title: "Anak saya kelas 8".to_string(),
            audience: Audience::Parent,
            segment: Segment::Smp,
            created_at: "2026-03-01T09:00:00".to_string(),
            updated_at: "2026-03-01T09:00:00".to_string(),
            messages: vec![ChatMessage::user("Halo Bu, saya dari bimbel online.")],
        };
        storage.save_conversation(&convo).await.unwrap();

        convo.messages.push(ChatMessage::assistant("Oh iya, ada apa ya?"));
        convo.updated_at = "2026-03-01T09:01:00".to_string();
        storage.save_conversation(&convo).await.unwrap();

        let listed = storage.list_conversations().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Anak saya kelas 8");

        let loaded = storage.get_conversation("abc123").await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 2);

        assert!(storage.delete_conversation("abc123").await.unwrap());
        assert!(storage.get_conversation("abc123").await.unwrap().is_none());

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
