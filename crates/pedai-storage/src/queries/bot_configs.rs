// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot configuration persistence.
//!
//! One row per store. `business_hours` is stored as a JSON document so the
//! weekly schedule can evolve without schema migrations.

use pedai_core::types::{BusinessHours, ConnectionStatus, Platform};
use pedai_core::PedaiError;
use rusqlite::params;

use crate::database::Database;
use crate::models::BotConfig;

fn map_config_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BotConfig> {
    let platform: String = row.get(1)?;
    let platform: Platform = platform.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let business_hours: String = row.get(7)?;
    let business_hours: BusinessHours =
        serde_json::from_str(&business_hours).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let connection_status: String = row.get(8)?;
    let connection_status: ConnectionStatus = connection_status.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(BotConfig {
        store_id: row.get(0)?,
        platform,
        access_token: row.get(2)?,
        phone_number_id: row.get(3)?,
        webhook_verify_token: row.get(4)?,
        auto_reply: row.get(5)?,
        welcome_message: row.get(6)?,
        business_hours,
        connection_status,
        updated_at: row.get(9)?,
    })
}

/// Get a store's bot configuration, if one has been saved.
pub async fn get_bot_config(db: &Database, store_id: &str) -> Result<Option<BotConfig>, PedaiError> {
    let store_id = store_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT store_id, platform, access_token, phone_number_id, \
                     webhook_verify_token, auto_reply, welcome_message, business_hours, \
                     connection_status, updated_at
                 FROM bot_configs WHERE store_id = ?1",
            )?;
            let mut rows = stmt.query_map(params![store_id], map_config_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace a store's bot configuration.
pub async fn upsert_bot_config(db: &Database, config: &BotConfig) -> Result<(), PedaiError> {
    let config = config.clone();
    let business_hours =
        serde_json::to_string(&config.business_hours).map_err(PedaiError::storage)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_configs (store_id, platform, access_token, phone_number_id, \
                     webhook_verify_token, auto_reply, welcome_message, business_hours, \
                     connection_status, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT (store_id) DO UPDATE SET
                     platform = excluded.platform,
                     access_token = excluded.access_token,
                     phone_number_id = excluded.phone_number_id,
                     webhook_verify_token = excluded.webhook_verify_token,
                     auto_reply = excluded.auto_reply,
                     welcome_message = excluded.welcome_message,
                     business_hours = excluded.business_hours,
                     connection_status = excluded.connection_status,
                     updated_at = excluded.updated_at",
                params![
                    config.store_id,
                    config.platform.to_string(),
                    config.access_token,
                    config.phone_number_id,
                    config.webhook_verify_token,
                    config.auto_reply,
                    config.welcome_message,
                    business_hours,
                    config.connection_status.to_string(),
                    config.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update only the connection status of a store's configuration.
pub async fn set_connection_status(
    db: &Database,
    store_id: &str,
    status: ConnectionStatus,
    updated_at: &str,
) -> Result<(), PedaiError> {
    let store_id = store_id.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE bot_configs SET connection_status = ?1, updated_at = ?2
                 WHERE store_id = ?3",
                params![status.to_string(), updated_at, store_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
