// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that the provider and storage adapters implement.

use async_trait::async_trait;

use crate::error::RolecallError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for rolecall adapters.
///
/// Gives every adapter an identity, a health probe and a shutdown hook so the
/// binary can report on and release them uniformly.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, RolecallError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), RolecallError>;
}
