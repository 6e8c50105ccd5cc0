// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `rolecall-core::types` so they can cross the
//! [`ConversationStore`](rolecall_core::ConversationStore) boundary. They are
//! re-exported here for convenience.

pub use rolecall_core::types::{ChatMessage, Conversation, ConversationSummary};
