// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management.
//!
//! Wraps a single `tokio_rusqlite::Connection`. Opening a database creates
//! the parent directory if needed, applies the connection pragmas, and runs
//! all pending migrations before returning.

use std::path::Path;

use pedai_core::PedaiError;
use tokio_rusqlite::Connection;

use crate::migrations;

/// Map a `tokio_rusqlite` error into the platform error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> PedaiError {
    PedaiError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
///
/// All reads and writes go through the single background thread owned by
/// the wrapped connection, which serializes access and avoids
/// `SQLITE_BUSY` under concurrent callers.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled.
    pub async fn open(path: &str) -> Result<Self, PedaiError> {
        Self::open_with_options(path, true).await
    }

    /// Open (or create) the database at `path`.
    ///
    /// `wal_mode` controls the journal mode; WAL is the production default,
    /// rollback journal is available for constrained filesystems.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, PedaiError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PedaiError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path).await.map_err(PedaiError::storage)?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(PedaiError::storage)?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(PedaiError::storage)?;
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(PedaiError::storage)?;
            conn.pragma_update(None, "busy_timeout", 5000)
                .map_err(PedaiError::storage)?;

            migrations::run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(e) => e,
            other => PedaiError::Internal(format!("database call failed: {other}")),
        })?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Access the underlying connection for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database, flushing the WAL.
    pub async fn close(self) -> Result<(), PedaiError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_directory_and_migrates() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/pedai.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        // Migration tables exist after open.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master
                     WHERE type = 'table' AND name IN ('stores', 'messages', 'bot_configs')",
                    [],
                    |row| row.get(0),
                )?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pedai.db");

        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        // Re-open runs migrations again without error.
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_without_wal() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pedai.db");
        let db = Database::open_with_options(db_path.to_str().unwrap(), false)
            .await
            .unwrap();
        db.close().await.unwrap();
    }
}
