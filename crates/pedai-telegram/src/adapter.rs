// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram platform adapter.
//!
//! Implements [`MessagingPlatform`] for the Telegram Bot API via teloxide.
//! Bot tokens are per-tenant, so a `Bot` is constructed from the store's
//! configuration on each send rather than held on the adapter.

use async_trait::async_trait;
use chrono::Utc;
use pedai_core::types::{BotConfig, MessageContent, NormalizedMessage, PlatformMessageId};
use pedai_core::{MessagingPlatform, PedaiError};
use teloxide::prelude::*;
use teloxide::types::{Recipient, Update, UpdateKind};
use tracing::{debug, warn};

/// Telegram platform adapter.
#[derive(Debug, Clone, Default)]
pub struct TelegramPlatform;

impl TelegramPlatform {
    pub fn new() -> Self {
        Self
    }
}

fn extract_content(msg: &Message) -> MessageContent {
    if let Some(text) = msg.text() {
        return MessageContent::Text {
            text: text.to_string(),
        };
    }
    if let Some(photos) = msg.photo() {
        // Telegram sends multiple resolutions; the last is the largest.
        if let Some(photo) = photos.last() {
            return MessageContent::Media {
                media_id: photo.file.id.to_string(),
                mime_type: Some("image/jpeg".to_string()),
                caption: msg.caption().map(str::to_string),
            };
        }
    }
    if let Some(doc) = msg.document() {
        return MessageContent::Media {
            media_id: doc.file.id.to_string(),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            caption: msg.caption().map(str::to_string),
        };
    }
    if let Some(voice) = msg.voice() {
        return MessageContent::Media {
            media_id: voice.file.id.to_string(),
            mime_type: voice.mime_type.as_ref().map(|m| m.to_string()),
            caption: None,
        };
    }
    if let Some(loc) = msg.location() {
        return MessageContent::Location {
            latitude: loc.latitude,
            longitude: loc.longitude,
            address: None,
        };
    }
    MessageContent::Empty
}

fn message_type_of(content: &MessageContent) -> &'static str {
    match content {
        MessageContent::Text { .. } => "text",
        MessageContent::Media { .. } => "media",
        MessageContent::Location { .. } => "location",
        MessageContent::Interactive { .. } => "interactive",
        MessageContent::Empty => "unknown",
    }
}

#[async_trait]
impl MessagingPlatform for TelegramPlatform {
    fn name(&self) -> &'static str {
        "telegram"
    }

    /// Telegram has no challenge handshake; verification compares the
    /// `X-Telegram-Bot-Api-Secret-Token` value against the configured
    /// verify token. Tenants without a configured token accept all posts
    /// (the webhook path itself is unguessable in that setup).
    fn verify_webhook(&self, config: &BotConfig, _mode: &str, token: &str) -> bool {
        match &config.webhook_verify_token {
            Some(expected) => token == expected,
            None => true,
        }
    }

    fn normalize(&self, payload: &serde_json::Value) -> Vec<NormalizedMessage> {
        // teloxide's custom `Update` deserializer borrows `&str` keys, which
        // fails when driven from a `serde_json::Value`; go through a string.
        let update: Update = match serde_json::from_str(&payload.to_string()) {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "unparseable telegram update");
                return Vec::new();
            }
        };

        let msg = match &update.kind {
            UpdateKind::Message(msg) => msg,
            _ => return Vec::new(),
        };

        let content = extract_content(msg);
        let customer_name = msg.from.as_ref().map(|u| u.full_name());

        vec![NormalizedMessage {
            // Telegram message ids are only unique per chat; prefix with
            // the chat id to get a store-wide idempotency key.
            platform_message_id: format!("{}:{}", msg.chat.id.0, msg.id.0),
            customer_phone: msg.chat.id.0.to_string(),
            customer_name,
            message_type: message_type_of(&content).to_string(),
            content,
            timestamp: msg.date.with_timezone(&Utc),
        }]
    }

    async fn send(
        &self,
        config: &BotConfig,
        to: &str,
        text: &str,
    ) -> Result<PlatformMessageId, PedaiError> {
        let token = config.access_token.as_deref().ok_or_else(|| {
            PedaiError::Channel {
                message: "telegram bot token not configured".to_string(),
                source: None,
            }
        })?;

        let chat_id = to.parse::<i64>().map(ChatId).map_err(|e| {
            PedaiError::Channel {
                message: format!("invalid telegram chat id `{to}`: {e}"),
                source: None,
            }
        })?;

        let bot = Bot::new(token);
        let sent = bot
            .send_message(Recipient::Id(chat_id), text)
            .await
            .map_err(|e| PedaiError::Channel {
                message: format!("telegram send failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(chat_id = chat_id.0, message_id = sent.id.0, "telegram message sent");
        Ok(PlatformMessageId(format!("{}:{}", chat_id.0, sent.id.0)))
    }
}
