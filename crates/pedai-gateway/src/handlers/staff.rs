// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff access link issuance and token validation.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pedai_core::types::StaffRole;
use pedai_tenant::ResolutionInput;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::tenant::Tenant;

/// Request body for POST /v1/staff/access-link.
#[derive(Debug, Deserialize)]
pub struct AccessLinkRequest {
    pub role: StaffRole,
}

/// Response body for POST /v1/staff/access-link.
#[derive(Debug, Serialize)]
pub struct AccessLinkResponse {
    pub success: bool,
    pub link: String,
    pub expires_at: String,
}

/// POST /v1/staff/access-link
///
/// Issues a signed deep link the store owner hands to a staff member.
/// Staff tokens may only mint links at counter level; a waiter token
/// cannot hand out new access links.
pub async fn create_access_link(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<AccessLinkRequest>,
) -> Response {
    if ctx.staff.is_some() {
        if let Err(e) = ctx.require_role(StaffRole::CounterAttendant) {
            return ApiError(e).into_response();
        }
    }

    match state.tokens.access_link(&ctx.store.id, body.role) {
        Ok(issued) => {
            info!(store_id = %ctx.store.id, role = %body.role, "staff access link issued");
            Json(AccessLinkResponse {
                success: true,
                link: issued.token,
                expires_at: issued.expires_at,
            })
            .into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// Request body for POST /v1/staff/validate.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// Response body for POST /v1/staff/validate.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub store_id: String,
    pub role: StaffRole,
    pub store_name: String,
}

/// POST /v1/staff/validate
///
/// Validates a staff token presented by the frontend when a staff member
/// opens their access link. Sits outside the tenant middleware because the
/// token itself names the tenant. Resolution enforces the store being
/// active, so suspended stores reject otherwise valid tokens.
pub async fn validate_staff_token(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> Response {
    let input = ResolutionInput {
        bearer_token: Some(body.token),
        ..ResolutionInput::default()
    };

    match state.resolver.resolve(&input).await {
        Ok(ctx) => {
            let claims = match ctx.staff {
                Some(claims) => claims,
                None => {
                    return ApiError(pedai_core::PedaiError::Auth(
                        "invalid or expired access token".to_string(),
                    ))
                    .into_response();
                }
            };
            Json(ValidateResponse {
                valid: true,
                store_id: claims.store_id,
                role: claims.role,
                store_name: ctx.store.name,
            })
            .into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}
