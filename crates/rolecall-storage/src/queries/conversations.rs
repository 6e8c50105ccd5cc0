// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation upsert, lookup, listing and deletion.

use std::str::FromStr;

use rolecall_core::{Audience, RolecallError, Segment};
use rusqlite::types::Type;
use rusqlite::{params, Row};

use crate::database::Database;
use crate::models::{ChatMessage, Conversation, ConversationSummary};

/// Insert a conversation, or overwrite the existing row with the same id.
///
/// `created_at` of an existing row is kept. Synthetic messages are never written.
pub async fn upsert_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), RolecallError> {
    let persisted: Vec<&ChatMessage> = conversation
        .messages
        .iter()
        .filter(|m| !m.synthetic)
        .collect();
    let messages_json = serde_json::to_string(&persisted).map_err(|e| RolecallError::Storage {
        source: Box::new(e),
    })?;

    let id = conversation.id.clone();
    let title = conversation.title.clone();
    let audience = conversation.audience.to_string();
    let segment = conversation.segment.to_string();
    let created_at = conversation.created_at.clone();
    let updated_at = conversation.updated_at.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, title, audience, segment, created_at, updated_at, messages_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     audience = excluded.audience,
                     segment = excluded.segment,
                     updated_at = excluded.updated_at,
                     messages_json = excluded.messages_json",
                params![id, title, audience, segment, created_at, updated_at, messages_json],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a conversation with its messages.
pub async fn get_conversation(
    db: &Database,
    id: &str,
) -> Result<Option<Conversation>, RolecallError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, audience, segment, created_at, updated_at, messages_json
                 FROM conversations WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                let summary = summary_from_row(row)?;
                let json: String = row.get(6)?;
                let messages: Vec<ChatMessage> = serde_json::from_str(&json)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
                Ok(Conversation {
                    id: summary.id,
                    title: summary.title,
                    audience: summary.audience,
                    segment: summary.segment,
                    created_at: summary.created_at,
                    updated_at: summary.updated_at,
                    messages,
                })
            });
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all conversations, most recently updated first.
pub async fn list_conversations(db: &Database) -> Result<Vec<ConversationSummary>, RolecallError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, audience, segment, created_at, updated_at
                 FROM conversations ORDER BY updated_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map([], summary_from_row)?;
            let mut summaries = Vec::new();
            for row in rows {
                summaries.push(row?);
            }
            Ok(summaries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a conversation. Returns whether a row existed.
pub async fn delete_conversation(db: &Database, id: &str) -> Result<bool, RolecallError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM conversations WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of stored conversations.
#[cfg(test)]
pub async fn count_conversations(db: &Database) -> Result<i64, RolecallError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0)))
        .await
        .map_err(crate::database::map_tr_err)
}

fn summary_from_row(row: &Row<'_>) -> Result<ConversationSummary, rusqlite::Error> {
    let audience: String = row.get(2)?;
    let segment: String = row.get(3)?;
    Ok(ConversationSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        audience: Audience::from_str(&audience)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        segment: Segment::from_str(&segment)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("conversations.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_conversation(id: &str, updated_at: &str, messages: Vec<ChatMessage>) -> Conversation {
        Conversation {
            id: id.to_string(),
            title: format!("title {id}"),
            audience: Audience::Parent,
            segment: Segment::Smp,
            created_at: updated_at.to_string(),
            updated_at: updated_at.to_string(),
            messages,
        }
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips_messages() {
        let (db, _dir) = setup_db().await;
        let convo = make_conversation(
            "c1",
            "2026-03-01T10:00:00",
            vec![ChatMessage::user("Selamat pagi"), ChatMessage::assistant("Pagi, ada apa ya?")],
        );
        upsert_conversation(&db, &convo).await.unwrap();

        let loaded = get_conversation(&db, "c1").await.unwrap().unwrap();
        assert_eq!(loaded, convo);
    }

    #[tokio::test]
    async fn upsert_same_id_overwrites_and_keeps_created_at() {
        let (db, _dir) = setup_db().await;
        let first = make_conversation("c1", "2026-03-01T10:00:00", vec![ChatMessage::user("a")]);
        upsert_conversation(&db, &first).await.unwrap();

        let mut second = make_conversation(
            "c1",
            "2026-03-01T10:05:00",
            vec![ChatMessage::user("a"), ChatMessage::assistant("b")],
        );
        second.title = "renamed".to_string();
        second.segment = Segment::Sma;
        upsert_conversation(&db, &second).await.unwrap();

        assert_eq!(count_conversations(&db).await.unwrap(), 1);
        let loaded = get_conversation(&db, "c1").await.unwrap().unwrap();
        assert_eq!(loaded.title, "renamed");
        assert_eq!(loaded.segment, Segment::Sma);
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.created_at, "2026-03-01T10:00:00");
        assert_eq!(loaded.updated_at, "2026-03-01T10:05:00");
    }

    #[tokio::test]
    async fn synthetic_messages_are_not_persisted() {
        let (db, _dir) = setup_db().await;
        let convo = make_conversation(
            "c1",
            "2026-03-01T10:00:00",
            vec![ChatMessage::trigger("OPENER"), ChatMessage::assistant("Kak, anak saya susah fokus.")],
        );
        upsert_conversation(&db, &convo).await.unwrap();

        let loaded = get_conversation(&db, "c1").await.unwrap().unwrap();
        assert_eq!(loaded.messages, vec![ChatMessage::assistant("Kak, anak saya susah fokus.")]);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_conversation(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_by_updated_at_desc() {
        let (db, _dir) = setup_db().await;
        for (id, ts) in [
            ("old", "2026-03-01T08:00:00"),
            ("new", "2026-03-03T08:00:00"),
            ("mid", "2026-03-02T08:00:00"),
        ] {
            upsert_conversation(&db, &make_conversation(id, ts, vec![ChatMessage::user("x")]))
                .await
                .unwrap();
        }

        let ids: Vec<String> = list_conversations(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let (db, _dir) = setup_db().await;
        upsert_conversation(&db, &make_conversation("c1", "2026-03-01T10:00:00", vec![]))
            .await
            .unwrap();

        assert!(delete_conversation(&db, "c1").await.unwrap());
        assert!(!delete_conversation(&db, "c1").await.unwrap());
        assert_eq!(count_conversations(&db).await.unwrap(), 0);
    }
}
