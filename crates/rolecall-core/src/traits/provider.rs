// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for hosted text-generation models.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::RolecallError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse, ProviderStreamChunk};

/// Boxed stream of response chunks returned by [`ProviderAdapter::stream`].
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<ProviderStreamChunk, RolecallError>> + Send>>;

/// Adapter for text-generation providers.
///
/// The model to call travels in [`ProviderRequest::model`], so one adapter
/// instance serves every fallback candidate.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a generation request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, RolecallError>;

    /// Sends a generation request and returns a stream of response chunks.
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, RolecallError>;
}
