// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Three route groups:
//! public (health, platform webhooks, staff token validation), and the
//! `/v1` API behind the tenant middleware.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use pedai_core::PedaiError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::tenant::tenant_middleware;

/// Build the gateway router.
///
/// Webhooks and staff token validation carry their tenant signal in the
/// request itself, so they sit outside the tenant middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::get_health))
        .route(
            "/webhook/whatsapp",
            get(handlers::webhooks::verify_whatsapp).post(handlers::webhooks::receive_whatsapp),
        )
        .route("/webhook/telegram", post(handlers::webhooks::receive_telegram))
        .route("/v1/staff/validate", post(handlers::staff::validate_staff_token))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/messages/send", post(handlers::messages::send_message))
        .route("/v1/messages/stats", get(handlers::messages::get_stats))
        .route("/v1/conversations", get(handlers::messages::list_conversations))
        .route(
            "/v1/conversations/{customer_phone}/messages",
            get(handlers::messages::get_conversation_messages),
        )
        .route(
            "/v1/bot-config",
            get(handlers::bot_config::get_bot_config).put(handlers::bot_config::put_bot_config),
        )
        .route("/v1/bot-config/test", post(handlers::bot_config::test_bot_config))
        .route(
            "/v1/telegram/validate",
            post(handlers::bot_config::validate_telegram_token),
        )
        .route(
            "/v1/staff/access-link",
            post(handlers::staff::create_access_link),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            tenant_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the gateway until the process exits.
pub async fn start_server(host: &str, port: u16, state: AppState) -> Result<(), PedaiError> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PedaiError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| PedaiError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
