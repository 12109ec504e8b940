// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store (tenant) CRUD operations.

use pedai_core::types::StoreStatus;
use pedai_core::PedaiError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Store;

fn map_store_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Store> {
    let status: String = row.get(3)?;
    let status: StoreStatus = status.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Store {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        status,
        owner: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const STORE_COLUMNS: &str = "id, slug, name, status, owner, created_at, updated_at";

/// Insert a new store.
pub async fn create_store(db: &Database, store: &Store) -> Result<(), PedaiError> {
    let store = store.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stores (id, slug, name, status, owner, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    store.id,
                    store.slug,
                    store.name,
                    store.status.to_string(),
                    store.owner,
                    store.created_at,
                    store.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a store by its id.
pub async fn get_store(db: &Database, id: &str) -> Result<Option<Store>, PedaiError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id], map_store_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a store by its subdomain slug.
pub async fn get_store_by_slug(db: &Database, slug: &str) -> Result<Option<Store>, PedaiError> {
    let slug = slug.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STORE_COLUMNS} FROM stores WHERE slug = ?1"
            ))?;
            let mut rows = stmt.query_map(params![slug], map_store_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Change a store's lifecycle status.
pub async fn set_store_status(
    db: &Database,
    id: &str,
    status: StoreStatus,
    updated_at: &str,
) -> Result<(), PedaiError> {
    let id = id.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE stores SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.to_string(), updated_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all stores, newest first.
pub async fn list_stores(db: &Database) -> Result<Vec<Store>, PedaiError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map([], map_store_row)?;
            let mut stores = Vec::new();
            for row in rows {
                stores.push(row?);
            }
            Ok(stores)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Test fixture shared by the storage query tests.
#[cfg(test)]
pub(crate) fn make_store(id: &str, slug: &str) -> Store {
    Store {
        id: id.to_string(),
        slug: slug.to_string(),
        name: format!("Loja {slug}"),
        status: StoreStatus::Active,
        owner: Some("owner-1".to_string()),
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
        updated_at: "2026-01-01T00:00:00+00:00".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_and_get_store() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        create_store(&db, &make_store("s1", "loja1")).await.unwrap();

        let by_id = get_store(&db, "s1").await.unwrap().unwrap();
        assert_eq!(by_id.slug, "loja1");
        assert!(by_id.is_active());

        let by_slug = get_store_by_slug(&db, "loja1").await.unwrap().unwrap();
        assert_eq!(by_slug.id, "s1");

        assert!(get_store(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn suspend_store() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        create_store(&db, &make_store("s1", "loja1")).await.unwrap();
        set_store_status(&db, "s1", StoreStatus::Suspended, "2026-02-01T00:00:00+00:00")
            .await
            .unwrap();

        let store = get_store(&db, "s1").await.unwrap().unwrap();
        assert_eq!(store.status, StoreStatus::Suspended);
        assert!(!store.is_active());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        create_store(&db, &make_store("s1", "loja1")).await.unwrap();
        let err = create_store(&db, &make_store("s2", "loja1")).await;
        assert!(err.is_err());
        db.close().await.unwrap();
    }
}
