// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for axum request handlers.

use std::sync::Arc;

use pedai_core::types::Platform;
use pedai_core::{AssistantResponder, MessagingPlatform};
use pedai_storage::Database;
use pedai_telegram::TelegramPlatform;
use pedai_tenant::{TenantResolver, TokenService};
use pedai_whatsapp::WhatsAppPlatform;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub resolver: Arc<TenantResolver>,
    pub tokens: Arc<TokenService>,
    pub whatsapp: Arc<WhatsAppPlatform>,
    pub telegram: Arc<TelegramPlatform>,
    pub responder: Arc<dyn AssistantResponder>,
    /// Global assistant switch from server configuration. Tenants can
    /// additionally disable auto-reply per store.
    pub assistant_enabled: bool,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// The adapter for a tenant's configured platform.
    pub fn platform_for(&self, platform: Platform) -> Arc<dyn MessagingPlatform> {
        match platform {
            Platform::Whatsapp => self.whatsapp.clone(),
            Platform::Telegram => self.telegram.clone(),
        }
    }
}
