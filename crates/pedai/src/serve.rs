// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pedai serve` command implementation.
//!
//! Wires storage, the tenant resolver, both platform adapters, and the
//! assistant client into the gateway state and runs the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use pedai_assistant::LisaClient;
use pedai_config::PedaiConfig;
use pedai_core::PedaiError;
use pedai_gateway::{start_server, AppState};
use pedai_storage::Database;
use pedai_telegram::TelegramPlatform;
use pedai_tenant::{TenantResolver, TokenService};
use pedai_whatsapp::WhatsAppPlatform;
use tracing::info;

/// Per-request timeout for outbound WhatsApp sends.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the `pedai serve` command.
pub async fn run_serve(config: PedaiConfig) -> Result<(), PedaiError> {
    init_tracing(&config.server.log_level);

    info!("starting pedai serve");

    // Token issuance and bearer resolution need a signing secret; refuse
    // to serve without one rather than running with tokens silently off.
    let jwt_secret = config.auth.jwt_secret.as_deref().ok_or_else(|| {
        PedaiError::Config(
            "auth.jwt_secret is required to serve; set it in pedai.toml or PEDAI_AUTH_JWT_SECRET"
                .to_string(),
        )
    })?;

    let db = Arc::new(
        Database::open_with_options(&config.storage.database_path, config.storage.wal_mode)
            .await?,
    );
    info!(path = %config.storage.database_path, "storage ready");

    let tokens = Arc::new(TokenService::new(
        jwt_secret,
        config.auth.staff_token_ttl_days as i64,
        &config.auth.frontend_base_url,
    ));
    let resolver = Arc::new(TenantResolver::new(db.clone(), tokens.clone()));

    let whatsapp = Arc::new(WhatsAppPlatform::new(SEND_TIMEOUT)?);
    let telegram = Arc::new(TelegramPlatform::default());

    let responder = Arc::new(LisaClient::new(&config.assistant)?);
    if config.assistant.enabled {
        info!(base_url = %config.assistant.base_url, "assistant responder enabled");
    } else {
        info!("assistant responder disabled by configuration");
    }

    let state = AppState {
        db,
        resolver,
        tokens,
        whatsapp,
        telegram,
        responder,
        assistant_enabled: config.assistant.enabled,
        start_time: std::time::Instant::now(),
    };

    start_server(&config.server.host, config.server.port, state).await
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pedai={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
