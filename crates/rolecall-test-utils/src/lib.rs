// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rolecall integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without network access.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock model provider scripted per model name
//! - [`RecordingSink`] - Display sink capturing rendered replies
//! - [`TestHarness`] - Engine over the mock provider and a temp database

pub mod harness;
pub mod mock_display;
pub mod mock_provider;

pub use harness::{FALLBACK_MODEL, PRIMARY_MODEL, TestHarness};
pub use mock_display::{DisplayEvent, RecordingSink};
pub use mock_provider::{MockProvider, RecordedCall, Script};
