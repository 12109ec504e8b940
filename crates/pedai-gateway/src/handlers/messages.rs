// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message send, conversation history, and reporting endpoints.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use pedai_core::types::conversation_id;
use pedai_storage::models::{ConversationSummary, MessageStats};
use pedai_storage::queries::{bot_configs, messages};
use serde::{Deserialize, Serialize};

use crate::error::{bad_request, ApiError};
use crate::pipeline;
use crate::state::AppState;
use crate::tenant::Tenant;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const DEFAULT_CONVERSATIONS_LIMIT: i64 = 20;

/// Request body for POST /v1/messages/send.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub message: String,
    /// Only "text" is accepted for manual sends.
    #[serde(default)]
    pub message_type: Option<String>,
}

/// Response body for POST /v1/messages/send.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message_id: String,
    pub platform_message_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}

/// Response body for GET /v1/messages/stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub period: String,
    #[serde(flatten)]
    pub stats: MessageStats,
}

/// Response body for GET /v1/conversations.
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// POST /v1/messages/send
///
/// Manual outbound send on behalf of the tenant (counter UI, staff chat).
pub async fn send_message(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<SendRequest>,
) -> Response {
    if body.to.is_empty() || body.message.is_empty() {
        return bad_request("`to` and `message` are required");
    }
    if body.message_type.as_deref().is_some_and(|t| t != "text") {
        return bad_request("only text messages are supported");
    }

    let config = match bot_configs::get_bot_config(&state.db, &ctx.store.id).await {
        Ok(Some(config)) => config,
        Ok(None) => return bad_request("bot not configured for this store"),
        Err(e) => return ApiError(e).into_response(),
    };

    let platform = state.platform_for(config.platform);
    match pipeline::send_and_record(
        &state.db,
        platform.as_ref(),
        config.platform,
        &ctx.store,
        &config,
        &body.to,
        &body.message,
    )
    .await
    {
        Ok(row) => Json(SendResponse {
            success: true,
            message_id: row.id,
            platform_message_id: row.platform_message_id,
        })
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /v1/conversations/{customer_phone}/messages
///
/// Conversation history in chronological order.
pub async fn get_conversation_messages(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(customer_phone): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let conv = conversation_id(&ctx.store.id, &customer_phone);

    match messages::recent_messages(&state.db, &conv, limit).await {
        Ok(mut rows) => {
            rows.reverse();
            Json(serde_json::json!({ "messages": rows })).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /v1/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_CONVERSATIONS_LIMIT)
        .clamp(1, 200);

    match messages::active_conversations(&state.db, &ctx.store.id, limit).await {
        Ok(conversations) => Json(ConversationListResponse { conversations }).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /v1/messages/stats?period=1d|7d|30d
pub async fn get_stats(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<StatsQuery>,
) -> Response {
    // Unknown periods fall back to the weekly window instead of erroring.
    let period = match query.period.as_deref() {
        Some(p @ ("1d" | "7d" | "30d")) => p,
        _ => "7d",
    };
    let days = match period {
        "1d" => 1,
        "30d" => 30,
        _ => 7,
    };

    let since = (Utc::now() - Duration::days(days)).to_rfc3339();
    match messages::message_stats(&state.db, &ctx.store.id, &since).await {
        Ok(stats) => Json(StatsResponse {
            period: period.to_string(),
            stats,
        })
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
