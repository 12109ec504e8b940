// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant middleware and extractor.
//!
//! Runs before every `/v1` handler: extracts the tenant signals from the
//! request, resolves them to a store, and attaches the [`StoreContext`] as
//! a request extension. Handlers receive it through the [`Tenant`]
//! extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use pedai_core::PedaiError;
use pedai_tenant::{ResolutionInput, StoreContext};

use crate::error::ApiError;
use crate::state::AppState;

/// Pull a single parameter out of a raw query string.
///
/// Store ids are URL-safe, so no percent-decoding is applied.
pub fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Build the resolver input from request headers and query string.
pub fn resolution_input(parts: &Parts) -> ResolutionInput {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let bearer_token = header("authorization")
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string));

    let query_store_id = parts
        .uri
        .query()
        .and_then(|q| query_param(q, "store_id"))
        .map(str::to_string);

    ResolutionInput {
        bearer_token,
        header_store_id: header("x-store-id"),
        query_store_id,
        host: header("host"),
    }
}

/// Middleware attaching the resolved [`StoreContext`] to the request.
pub async fn tenant_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let input = resolution_input(&parts);

    match state.resolver.resolve(&input).await {
        Ok(ctx) => {
            parts.extensions.insert(ctx);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// Extractor for the tenant attached by [`tenant_middleware`].
pub struct Tenant(pub StoreContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<StoreContext>()
            .cloned()
            .map(Tenant)
            .ok_or_else(|| {
                ApiError(PedaiError::Internal(
                    "tenant context missing on request".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_finds_value() {
        assert_eq!(query_param("store_id=s1&x=2", "store_id"), Some("s1"));
        assert_eq!(query_param("x=2&store_id=s1", "store_id"), Some("s1"));
        assert_eq!(query_param("x=2", "store_id"), None);
        assert_eq!(query_param("", "store_id"), None);
    }

    #[test]
    fn resolution_input_extracts_all_signals() {
        let req = axum::http::Request::builder()
            .uri("/v1/conversations?store_id=s9")
            .header("authorization", "Bearer tok-123")
            .header("x-store-id", "s7")
            .header("host", "loja1.pedai.com")
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();

        let input = resolution_input(&parts);
        assert_eq!(input.bearer_token.as_deref(), Some("tok-123"));
        assert_eq!(input.header_store_id.as_deref(), Some("s7"));
        assert_eq!(input.query_store_id.as_deref(), Some("s9"));
        assert_eq!(input.host.as_deref(), Some("loja1.pedai.com"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let req = axum::http::Request::builder()
            .uri("/v1/conversations")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        assert!(resolution_input(&parts).bearer_token.is_none());
    }
}
