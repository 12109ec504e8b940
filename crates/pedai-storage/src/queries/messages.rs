// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message persistence and reporting queries.

use pedai_core::PedaiError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ConversationSummary, Message, MessageStats};

const MESSAGE_COLUMNS: &str = "id, store_id, conversation_id, customer_phone, customer_name, \
     platform, platform_message_id, direction, message_type, content, status, \
     assistant_reply, created_at";

fn map_message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        store_id: row.get(1)?,
        conversation_id: row.get(2)?,
        customer_phone: row.get(3)?,
        customer_name: row.get(4)?,
        platform: row.get(5)?,
        platform_message_id: row.get(6)?,
        direction: row.get(7)?,
        message_type: row.get(8)?,
        content: row.get(9)?,
        status: row.get(10)?,
        assistant_reply: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// Insert a message, skipping duplicates.
///
/// Returns `true` when the row was inserted and `false` when a message with
/// the same `(store_id, platform_message_id)` already exists. Webhook
/// re-deliveries take the `false` path and are treated as success upstream.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<bool, PedaiError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO messages (id, store_id, conversation_id, customer_phone, \
                     customer_name, platform, platform_message_id, direction, message_type, \
                     content, status, assistant_reply, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                 ON CONFLICT (store_id, platform_message_id) DO NOTHING",
                params![
                    msg.id,
                    msg.store_id,
                    msg.conversation_id,
                    msg.customer_phone,
                    msg.customer_name,
                    msg.platform,
                    msg.platform_message_id,
                    msg.direction,
                    msg.message_type,
                    msg.content,
                    msg.status,
                    msg.assistant_reply,
                    msg.created_at,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the most recent messages for a conversation, newest first.
///
/// Callers that need chronological order (assistant context, conversation
/// history views) reverse the result.
pub async fn recent_messages(
    db: &Database,
    conversation_id: &str,
    limit: i64,
) -> Result<Vec<Message>, PedaiError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit], map_message_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flag an inbound message as having produced an assistant reply.
pub async fn mark_assistant_processed(db: &Database, message_id: &str) -> Result<(), PedaiError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET assistant_reply = 1 WHERE id = ?1",
                params![message_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a message's delivery status.
pub async fn set_message_status(
    db: &Database,
    message_id: &str,
    status: &str,
) -> Result<(), PedaiError> {
    let message_id = message_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET status = ?1 WHERE id = ?2",
                params![status, message_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a store's conversations ordered by latest activity.
///
/// One summary per customer phone: the most recent message plus the total
/// message count for that customer.
pub async fn active_conversations(
    db: &Database,
    store_id: &str,
    limit: i64,
) -> Result<Vec<ConversationSummary>, PedaiError> {
    let store_id = store_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.customer_phone, m.customer_name, m.content, m.direction,
                        m.created_at, c.cnt
                 FROM messages m
                 JOIN (SELECT customer_phone, MAX(created_at) AS last_at, COUNT(*) AS cnt
                       FROM messages WHERE store_id = ?1
                       GROUP BY customer_phone) c
                   ON m.customer_phone = c.customer_phone AND m.created_at = c.last_at
                 WHERE m.store_id = ?1
                 GROUP BY m.customer_phone
                 ORDER BY m.created_at DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![store_id, limit], |row| {
                Ok(ConversationSummary {
                    customer_phone: row.get(0)?,
                    customer_name: row.get(1)?,
                    last_content: row.get(2)?,
                    last_direction: row.get(3)?,
                    last_message_at: row.get(4)?,
                    message_count: row.get(5)?,
                })
            })?;
            let mut summaries = Vec::new();
            for row in rows {
                summaries.push(row?);
            }
            Ok(summaries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Aggregate message counters for a store since a given RFC 3339 instant.
pub async fn message_stats(
    db: &Database,
    store_id: &str,
    since: &str,
) -> Result<MessageStats, PedaiError> {
    let store_id = store_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN direction = 'inbound' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN direction = 'outbound' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN assistant_reply THEN 1 ELSE 0 END), 0),
                        COUNT(DISTINCT customer_phone)
                 FROM messages WHERE store_id = ?1 AND created_at >= ?2",
                params![store_id, since],
                |row| {
                    Ok(MessageStats {
                        total: row.get(0)?,
                        inbound: row.get(1)?,
                        outbound: row.get(2)?,
                        assistant_processed: row.get(3)?,
                        unique_customers: row.get(4)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
