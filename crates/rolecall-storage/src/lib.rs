// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite conversation history for the rolecall simulator.
//!
//! One `conversations` table, created by an embedded migration, holds a row
//! per conversation with its messages as a JSON array. Access goes through a
//! single `tokio-rusqlite` connection.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;
