// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant resolution.
//!
//! Every request is mapped to exactly one store before any handler runs.
//! Resolution sources are tried in a fixed order and the first hit wins:
//!
//! 1. `Authorization: Bearer` staff token (store id from the claims)
//! 2. `x-store-id` header
//! 3. `store_id` query parameter
//! 4. Subdomain of the request host, matched against the store slug
//!
//! There is no fallback tenant: a request that matches none of the four
//! sources is rejected, never silently attributed to a default store.

use std::sync::Arc;

use pedai_core::types::{StaffRole, Store};
use pedai_core::PedaiError;
use pedai_storage::queries::stores;
use pedai_storage::Database;

use crate::token::{StaffClaims, TokenService};

/// The tenant signals extracted from an incoming request.
#[derive(Debug, Default, Clone)]
pub struct ResolutionInput {
    pub bearer_token: Option<String>,
    pub header_store_id: Option<String>,
    pub query_store_id: Option<String>,
    pub host: Option<String>,
}

/// A resolved tenant, attached to the request for downstream handlers.
#[derive(Debug, Clone)]
pub struct StoreContext {
    pub store: Store,
    /// Present when resolution came from a staff token.
    pub staff: Option<StaffClaims>,
}

impl StoreContext {
    /// Require that the request was authenticated with the given staff role.
    pub fn require_role(&self, role: StaffRole) -> Result<(), PedaiError> {
        match &self.staff {
            Some(claims) if claims.role == role => Ok(()),
            _ => Err(PedaiError::Auth("insufficient permissions".to_string())),
        }
    }
}

/// Extract the tenant subdomain from a host header value.
///
/// `loja1.pedai.com` -> `loja1`; bare domains, `www.` and `api.` hosts,
/// and `localhost` yield no subdomain.
pub fn subdomain_of(host: &str) -> Option<&str> {
    let host = host.split(':').next().unwrap_or(host);
    let mut parts = host.split('.');
    let first = parts.next()?;
    // Need at least two more labels for `first` to be a subdomain.
    if parts.count() < 2 {
        return None;
    }
    if first.is_empty() || first == "www" || first == "api" {
        return None;
    }
    Some(first)
}

/// Resolves requests to stores.
pub struct TenantResolver {
    db: Arc<Database>,
    tokens: Arc<TokenService>,
}

impl TenantResolver {
    pub fn new(db: Arc<Database>, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }

    /// Resolve the tenant for a request.
    pub async fn resolve(&self, input: &ResolutionInput) -> Result<StoreContext, PedaiError> {
        if let Some(token) = input.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            let claims = self.tokens.verify(token)?;
            let store = self.active_store_by_id(&claims.store_id).await?;
            tracing::debug!(store_id = %store.id, source = "bearer", "tenant resolved");
            return Ok(StoreContext {
                store,
                staff: Some(claims),
            });
        }

        if let Some(id) = input.header_store_id.as_deref().filter(|s| !s.is_empty()) {
            let store = self.active_store_by_id(id).await?;
            tracing::debug!(store_id = %store.id, source = "header", "tenant resolved");
            return Ok(StoreContext { store, staff: None });
        }

        if let Some(id) = input.query_store_id.as_deref().filter(|s| !s.is_empty()) {
            let store = self.active_store_by_id(id).await?;
            tracing::debug!(store_id = %store.id, source = "query", "tenant resolved");
            return Ok(StoreContext { store, staff: None });
        }

        if let Some(slug) = input.host.as_deref().and_then(subdomain_of) {
            let store = self.active_store_by_slug(slug).await?;
            tracing::debug!(store_id = %store.id, source = "subdomain", "tenant resolved");
            return Ok(StoreContext { store, staff: None });
        }

        Err(PedaiError::TenantNotFound(
            "no tenant signal on request".to_string(),
        ))
    }

    async fn active_store_by_id(&self, id: &str) -> Result<Store, PedaiError> {
        match stores::get_store(&self.db, id).await? {
            Some(store) if store.is_active() => Ok(store),
            Some(_) => Err(PedaiError::Auth("store access denied".to_string())),
            None => Err(PedaiError::TenantNotFound(format!("unknown store `{id}`"))),
        }
    }

    async fn active_store_by_slug(&self, slug: &str) -> Result<Store, PedaiError> {
        match stores::get_store_by_slug(&self.db, slug).await? {
            Some(store) if store.is_active() => Ok(store),
            Some(_) => Err(PedaiError::Auth("store access denied".to_string())),
            None => Err(PedaiError::TenantNotFound(format!(
                "unknown store slug `{slug}`"
            ))),
        }
    }
}
