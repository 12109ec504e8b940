// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform webhook endpoints.
//!
//! Webhook requests carry no staff credentials, so the tenant must be
//! named out of band with a `store_id` query parameter; requests without
//! one are rejected rather than attributed to any default store.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pedai_core::types::Platform;
use pedai_core::MessagingPlatform;
use pedai_storage::queries::bot_configs;
use pedai_tenant::ResolutionInput;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{bad_request, ApiError};
use crate::pipeline::{self, PipelineOutcome};
use crate::state::AppState;

/// Response body for webhook POSTs.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub processed: usize,
}

async fn resolve_webhook_store(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<pedai_core::Store, Response> {
    let store_id = match params.get("store_id").filter(|s| !s.is_empty()) {
        Some(id) => id.clone(),
        None => return Err(bad_request("store_id query parameter is required")),
    };

    let input = ResolutionInput {
        query_store_id: Some(store_id),
        ..ResolutionInput::default()
    };
    state
        .resolver
        .resolve(&input)
        .await
        .map(|ctx| ctx.store)
        .map_err(|e| ApiError(e).into_response())
}

/// GET /webhook/whatsapp
///
/// Meta's verification handshake: echo `hub.challenge` back as plain text
/// when the mode and verify token match the tenant's configuration.
pub async fn verify_whatsapp(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = match resolve_webhook_store(&state, &params).await {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    let config = match bot_configs::get_bot_config(&state.db, &store.id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            return (StatusCode::FORBIDDEN, "webhook not configured").into_response();
        }
        Err(e) => return ApiError(e).into_response(),
    };

    let mode = params.get("hub.mode").map(String::as_str).unwrap_or("");
    let token = params
        .get("hub.verify_token")
        .map(String::as_str)
        .unwrap_or("");
    let challenge = params
        .get("hub.challenge")
        .map(String::as_str)
        .unwrap_or("");

    if state.whatsapp.verify_webhook(&config, mode, token) {
        debug!(store_id = %store.id, "whatsapp webhook verified");
        (StatusCode::OK, challenge.to_string()).into_response()
    } else {
        warn!(store_id = %store.id, "whatsapp webhook verification rejected");
        (StatusCode::FORBIDDEN, "verification failed").into_response()
    }
}

async fn run_pipeline(
    state: &AppState,
    store: &pedai_core::Store,
    platform: &dyn MessagingPlatform,
    platform_kind: Platform,
    payload: &serde_json::Value,
) -> Response {
    let normalized = platform.normalize(payload);
    let mut processed = 0;

    for msg in normalized {
        match pipeline::process_inbound(
            &state.db,
            state.responder.as_ref(),
            state.assistant_enabled,
            platform,
            platform_kind,
            store,
            msg,
        )
        .await
        {
            Ok(outcome) => {
                if outcome != PipelineOutcome::Duplicate {
                    processed += 1;
                }
                debug!(store_id = %store.id, ?outcome, "webhook message processed");
            }
            Err(e) => return ApiError(e).into_response(),
        }
    }

    Json(WebhookResponse {
        success: true,
        processed,
    })
    .into_response()
}

/// POST /webhook/whatsapp
pub async fn receive_whatsapp(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let store = match resolve_webhook_store(&state, &params).await {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    let whatsapp = state.whatsapp.clone();
    run_pipeline(&state, &store, whatsapp.as_ref(), Platform::Whatsapp, &payload).await
}

/// POST /webhook/telegram
///
/// When the tenant has a verify token configured, the
/// `X-Telegram-Bot-Api-Secret-Token` header must match it.
pub async fn receive_telegram(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let store = match resolve_webhook_store(&state, &params).await {
        Ok(store) => store,
        Err(resp) => return resp,
    };

    let secret = headers
        .get("x-telegram-bot-api-secret-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match bot_configs::get_bot_config(&state.db, &store.id).await {
        Ok(Some(config)) => {
            if !state.telegram.verify_webhook(&config, "", secret) {
                warn!(store_id = %store.id, "telegram webhook secret mismatch");
                return (StatusCode::FORBIDDEN, "verification failed").into_response();
            }
        }
        Ok(None) => {}
        Err(e) => return ApiError(e).into_response(),
    }

    let telegram = state.telegram.clone();
    run_pipeline(&state, &store, telegram.as_ref(), Platform::Telegram, &payload).await
}
