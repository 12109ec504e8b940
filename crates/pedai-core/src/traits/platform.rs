// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging-platform adapter trait.
//!
//! WhatsApp and Telegram share one logical pipeline but differ in webhook
//! shape and send API. Each platform implements this trait once; the
//! gateway selects the implementation from the tenant's configuration.

use async_trait::async_trait;

use crate::error::PedaiError;
use crate::types::{BotConfig, NormalizedMessage, PlatformMessageId};

/// Adapter for one external messaging platform.
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Stable platform name ("whatsapp", "telegram").
    fn name(&self) -> &'static str;

    /// Checks a webhook verification request against the tenant's
    /// configured verify token.
    fn verify_webhook(&self, config: &BotConfig, mode: &str, token: &str) -> bool;

    /// Maps a raw webhook body into normalized messages.
    ///
    /// Payloads without messages (status updates, unsupported events)
    /// yield an empty vec. Individual messages of unrecognized type are
    /// kept, with [`MessageContent::Empty`](crate::types::MessageContent)
    /// content -- never dropped.
    fn normalize(&self, payload: &serde_json::Value) -> Vec<NormalizedMessage>;

    /// Sends a text message through the platform's send API.
    async fn send(
        &self,
        config: &BotConfig,
        to: &str,
        text: &str,
    ) -> Result<PlatformMessageId, PedaiError>;
}
