// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tenant bot configuration endpoints.
//!
//! Secrets (access token, webhook verify token) never leave the server:
//! reads return `***` in their place, and writes that send `***` back keep
//! the stored value.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use pedai_core::types::{BotConfig, BusinessHours, ConnectionStatus, Platform};
use pedai_core::PedaiError;
use pedai_storage::queries::bot_configs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{bad_request, ApiError, ErrorBody};
use crate::state::AppState;
use crate::tenant::Tenant;

/// Placeholder returned in place of stored secrets.
const REDACTED: &str = "***";

fn redacted(mut config: BotConfig) -> BotConfig {
    if config.access_token.is_some() {
        config.access_token = Some(REDACTED.to_string());
    }
    if config.webhook_verify_token.is_some() {
        config.webhook_verify_token = Some(REDACTED.to_string());
    }
    config
}

/// Keep the stored secret when the client echoes the redaction placeholder.
fn merge_secret(incoming: Option<String>, stored: Option<String>) -> Option<String> {
    match incoming {
        Some(v) if v == REDACTED => stored,
        other => other,
    }
}

/// Request body for PUT /v1/bot-config.
#[derive(Debug, Deserialize)]
pub struct BotConfigUpdate {
    pub platform: Platform,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub phone_number_id: Option<String>,
    #[serde(default)]
    pub webhook_verify_token: Option<String>,
    #[serde(default)]
    pub auto_reply: Option<bool>,
    #[serde(default)]
    pub welcome_message: Option<String>,
    #[serde(default)]
    pub business_hours: Option<BusinessHours>,
}

/// GET /v1/bot-config
pub async fn get_bot_config(State(state): State<AppState>, Tenant(ctx): Tenant) -> Response {
    match bot_configs::get_bot_config(&state.db, &ctx.store.id).await {
        Ok(Some(config)) => Json(redacted(config)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "bot not configured for this store".to_string(),
            }),
        )
            .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// PUT /v1/bot-config
pub async fn put_bot_config(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<BotConfigUpdate>,
) -> Response {
    let existing = match bot_configs::get_bot_config(&state.db, &ctx.store.id).await {
        Ok(existing) => existing,
        Err(e) => return ApiError(e).into_response(),
    };

    let base = existing
        .clone()
        .unwrap_or_else(|| BotConfig::new(&ctx.store.id, body.platform));

    let config = BotConfig {
        store_id: ctx.store.id.clone(),
        platform: body.platform,
        access_token: merge_secret(body.access_token, base.access_token),
        phone_number_id: body.phone_number_id.or(base.phone_number_id),
        webhook_verify_token: merge_secret(body.webhook_verify_token, base.webhook_verify_token),
        auto_reply: body.auto_reply.unwrap_or(base.auto_reply),
        welcome_message: body.welcome_message.unwrap_or(base.welcome_message),
        business_hours: body.business_hours.unwrap_or(base.business_hours),
        connection_status: base.connection_status,
        updated_at: Utc::now().to_rfc3339(),
    };

    if let Err(e) = bot_configs::upsert_bot_config(&state.db, &config).await {
        return ApiError(e).into_response();
    }

    info!(store_id = %ctx.store.id, platform = %config.platform, "bot config saved");
    Json(redacted(config)).into_response()
}

/// Response body for POST /v1/bot-config/test.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub connection_status: ConnectionStatus,
}

/// Checks the tenant's credentials against the configured platform.
///
/// Telegram tokens are verified with a live `getMe` call; WhatsApp has
/// no equivalent cheap probe, so the check is credential completeness.
async fn check_connection(config: &BotConfig) -> Result<(), PedaiError> {
    match config.platform {
        Platform::Telegram => {
            let token = config.access_token.as_deref().ok_or_else(|| {
                PedaiError::Channel {
                    message: "telegram bot token not configured".to_string(),
                    source: None,
                }
            })?;
            let info = pedai_telegram::validate_token(token).await?;
            info!(bot = %info.first_name, "telegram connection verified");
            Ok(())
        }
        Platform::Whatsapp => {
            if config.access_token.is_some() && config.phone_number_id.is_some() {
                Ok(())
            } else {
                Err(PedaiError::Channel {
                    message:
                        "whatsapp credentials incomplete: access_token and phone_number_id are required"
                            .to_string(),
                    source: None,
                })
            }
        }
    }
}

/// POST /v1/bot-config/test
///
/// Verifies the tenant's platform connection and records the result on
/// the configuration's `connection_status`.
pub async fn test_bot_config(State(state): State<AppState>, Tenant(ctx): Tenant) -> Response {
    let config = match bot_configs::get_bot_config(&state.db, &ctx.store.id).await {
        Ok(Some(config)) => config,
        Ok(None) => return bad_request("bot not configured for this store"),
        Err(e) => return ApiError(e).into_response(),
    };

    let result = check_connection(&config).await;
    let status = if result.is_ok() {
        ConnectionStatus::Connected
    } else {
        ConnectionStatus::Error
    };
    if let Err(e) = bot_configs::set_connection_status(
        &state.db,
        &ctx.store.id,
        status,
        &Utc::now().to_rfc3339(),
    )
    .await
    {
        return ApiError(e).into_response();
    }

    match result {
        Ok(()) => Json(TestResponse {
            success: true,
            connection_status: status,
        })
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Request body for POST /v1/telegram/validate.
#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    pub access_token: String,
}

/// POST /v1/telegram/validate
///
/// Validates a Telegram bot token with `getMe` and returns the bot's
/// identity. The token is not persisted by this endpoint.
pub async fn validate_telegram_token(
    State(_state): State<AppState>,
    Tenant(_ctx): Tenant,
    Json(body): Json<ValidateTokenRequest>,
) -> Response {
    match pedai_telegram::validate_token(&body.access_token).await {
        Ok(info) => Json(serde_json::json!({ "success": true, "bot_info": info })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
