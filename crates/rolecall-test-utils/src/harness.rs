// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`RoleplayEngine`] over a [`MockProvider`] and
//! a temp SQLite database. `send_message()` drives a full turn.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rolecall_agent::{Reply, RoleplayEngine};
use rolecall_config::RolecallConfig;
use rolecall_config::model::StorageConfig;
use rolecall_core::{Audience, ConversationStore, RolecallError, Segment};
use rolecall_storage::SqliteStorage;

use crate::mock_display::RecordingSink;
use crate::mock_provider::{MockProvider, Script};

/// Primary model name used by the harness.
pub const PRIMARY_MODEL: &str = "mock-primary";
/// Fallback model name used by the harness.
pub const FALLBACK_MODEL: &str = "mock-fallback";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    scripts: Vec<(String, Script)>,
    audience: Audience,
    segment: Segment,
    seed: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            scripts: Vec::new(),
            audience: Audience::Parent,
            segment: Segment::Smp,
            seed: 7,
        }
    }

    /// Queued replies for models without a script.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_script(mut self, model: &str, script: Script) -> Self {
        self.scripts.push((model.to_string(), script));
        self
    }

    pub fn with_persona(mut self, audience: Audience, segment: Segment) -> Self {
        self.audience = audience;
        self.segment = segment;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the harness, creating and migrating the temp database.
    pub async fn build(self) -> Result<TestHarness, RolecallError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RolecallError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("history.db");

        let storage_config = StorageConfig {
            enabled: true,
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let storage = SqliteStorage::new(storage_config.clone());
        storage.initialize().await?;
        let storage = Arc::new(storage);

        let mut provider = MockProvider::with_responses(self.responses);
        for (model, script) in self.scripts {
            provider = provider.script(&model, script);
        }
        let mock_provider = Arc::new(provider);

        let mut config = RolecallConfig::default();
        config.gemini.model = PRIMARY_MODEL.to_string();
        config.gemini.fallback_models = vec![FALLBACK_MODEL.to_string()];
        config.persona.audience = self.audience;
        config.persona.segment = self.segment;
        config.storage = storage_config;

        let engine = RoleplayEngine::new(
            config,
            mock_provider.clone(),
            Some(storage.clone() as Arc<dyn ConversationStore>),
        )
        .with_rng(StdRng::seed_from_u64(self.seed));

        Ok(TestHarness {
            mock_provider,
            storage,
            engine,
            sink: RecordingSink::new(),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock provider and temp storage.
pub struct TestHarness {
    pub mock_provider: Arc<MockProvider>,
    /// SQLite store (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub engine: RoleplayEngine,
    /// Everything the engine displayed.
    pub sink: RecordingSink,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Sends a salesperson message and returns the reply text, if any.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<String>, RolecallError> {
        let reply = self.engine.submit_user(text, &mut self.sink).await?;
        Ok(reply.map(|r: Reply| r.text))
    }

    /// Requests an opener played by `audience`.
    pub async fn opener(&mut self, audience: Audience) -> Result<Option<String>, RolecallError> {
        let reply = self.engine.trigger_opener(audience, &mut self.sink).await?;
        Ok(reply.map(|r| r.text))
    }
}
