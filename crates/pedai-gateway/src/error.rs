// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pedai_core::PedaiError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wrapper mapping [`PedaiError`] onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub PedaiError);

impl From<PedaiError> for ApiError {
    fn from(err: PedaiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PedaiError::Auth(_) => StatusCode::UNAUTHORIZED,
            PedaiError::TenantNotFound(_) => StatusCode::NOT_FOUND,
            PedaiError::Channel { .. } | PedaiError::Assistant { .. } => StatusCode::BAD_GATEWAY,
            PedaiError::Config(_) | PedaiError::Storage { .. } | PedaiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// A client error with an explicit status and message.
pub fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_maps_to_401() {
        let resp = ApiError(PedaiError::Auth("nope".into())).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn tenant_not_found_maps_to_404() {
        let resp = ApiError(PedaiError::TenantNotFound("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn channel_maps_to_502() {
        let resp = ApiError(PedaiError::Channel {
            message: "down".into(),
            source: None,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
