// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Business Cloud API adapter.
//!
//! Implements [`MessagingPlatform`] against the Graph API. Credentials are
//! per-tenant, so the access token rides on each request rather than on the
//! shared client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pedai_core::types::{BotConfig, MessageContent, NormalizedMessage, PlatformMessageId};
use pedai_core::{MessagingPlatform, PedaiError};
use tracing::{debug, warn};

use crate::types::{SendMessageRequest, SendMessageResponse, WaMessage, WebhookPayload};

/// Base URL for the WhatsApp Business Cloud API.
const API_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// WhatsApp platform adapter.
#[derive(Debug, Clone)]
pub struct WhatsAppPlatform {
    client: reqwest::Client,
    base_url: String,
}

impl WhatsAppPlatform {
    pub fn new(timeout: Duration) -> Result<Self, PedaiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PedaiError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

fn extract_content(msg: &WaMessage) -> MessageContent {
    match msg.message_type.as_str() {
        "text" => match &msg.text {
            Some(text) => MessageContent::Text {
                text: text.body.clone(),
            },
            None => MessageContent::Empty,
        },
        "image" | "audio" | "video" | "document" => {
            let media = match msg.message_type.as_str() {
                "image" => &msg.image,
                "audio" => &msg.audio,
                "video" => &msg.video,
                _ => &msg.document,
            };
            match media {
                Some(m) => MessageContent::Media {
                    media_id: m.id.clone(),
                    mime_type: m.mime_type.clone(),
                    caption: m.caption.clone(),
                },
                None => MessageContent::Empty,
            }
        }
        "location" => match &msg.location {
            Some(loc) => MessageContent::Location {
                latitude: loc.latitude,
                longitude: loc.longitude,
                address: loc.address.clone(),
            },
            None => MessageContent::Empty,
        },
        "interactive" => {
            let reply = msg
                .interactive
                .as_ref()
                .and_then(|i| i.button_reply.as_ref().or(i.list_reply.as_ref()));
            match reply {
                Some(r) => MessageContent::Interactive {
                    title: r.title.clone(),
                },
                None => MessageContent::Empty,
            }
        }
        // Unknown types are kept, not dropped.
        _ => MessageContent::Empty,
    }
}

fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

#[async_trait]
impl MessagingPlatform for WhatsAppPlatform {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn verify_webhook(&self, config: &BotConfig, mode: &str, token: &str) -> bool {
        match &config.webhook_verify_token {
            Some(expected) => mode == "subscribe" && token == expected,
            None => false,
        }
    }

    fn normalize(&self, payload: &serde_json::Value) -> Vec<NormalizedMessage> {
        let payload: WebhookPayload = match serde_json::from_value(payload.clone()) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "unparseable webhook payload");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for entry in &payload.entry {
            for change in &entry.changes {
                let value = &change.value;
                for msg in &value.messages {
                    // Contact name matched by wa_id, falling back to the
                    // first contact in the envelope.
                    let name = value
                        .contacts
                        .iter()
                        .find(|c| c.wa_id.as_deref() == Some(msg.from.as_str()))
                        .or_else(|| value.contacts.first())
                        .and_then(|c| c.profile.as_ref())
                        .and_then(|p| p.name.clone());

                    out.push(NormalizedMessage {
                        platform_message_id: msg.id.clone(),
                        customer_phone: msg.from.clone(),
                        customer_name: name,
                        message_type: msg.message_type.clone(),
                        content: extract_content(msg),
                        timestamp: parse_timestamp(msg.timestamp.as_deref()),
                    });
                }
            }
        }
        out
    }

    async fn send(
        &self,
        config: &BotConfig,
        to: &str,
        text: &str,
    ) -> Result<PlatformMessageId, PedaiError> {
        let access_token = config.access_token.as_deref().ok_or_else(|| {
            PedaiError::Channel {
                message: "whatsapp access token not configured".to_string(),
                source: None,
            }
        })?;
        let phone_number_id = config.phone_number_id.as_deref().ok_or_else(|| {
            PedaiError::Channel {
                message: "whatsapp phone number id not configured".to_string(),
                source: None,
            }
        })?;

        let url = format!("{}/{}/messages", self.base_url, phone_number_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&SendMessageRequest::text(to, text))
            .send()
            .await
            .map_err(|e| PedaiError::Channel {
                message: format!("whatsapp send failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PedaiError::Channel {
                message: format!("whatsapp API returned {status}: {body}"),
                source: None,
            });
        }

        let body: SendMessageResponse =
            response.json().await.map_err(|e| PedaiError::Channel {
                message: format!("malformed whatsapp send response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let id = body
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| PedaiError::Channel {
                message: "whatsapp send response missing message id".to_string(),
                source: None,
            })?;

        debug!(to, message_id = %id, "whatsapp message sent");
        Ok(PlatformMessageId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedai_core::types::Platform;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn platform() -> WhatsAppPlatform {
        WhatsAppPlatform::new(Duration::from_secs(5)).unwrap()
    }

    fn config_with_verify_token(token: &str) -> BotConfig {
        let mut config = BotConfig::new("s1", Platform::Whatsapp);
        config.webhook_verify_token = Some(token.to_string());
        config
    }

    fn webhook_payload(message: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": { "phone_number_id": "1029384756" },
                        "contacts": [{
                            "wa_id": "5511999998888",
                            "profile": { "name": "Maria" }
                        }],
                        "messages": [message]
                    }
                }]
            }]
        })
    }

    #[test]
    fn verify_webhook_requires_subscribe_and_matching_token() {
        let p = platform();
        let config = config_with_verify_token("verify-me");

        assert!(p.verify_webhook(&config, "subscribe", "verify-me"));
        assert!(!p.verify_webhook(&config, "subscribe", "wrong"));
        assert!(!p.verify_webhook(&config, "unsubscribe", "verify-me"));

        let unconfigured = BotConfig::new("s1", Platform::Whatsapp);
        assert!(!p.verify_webhook(&unconfigured, "subscribe", "anything"));
    }

    #[test]
    fn normalize_text_message() {
        let p = platform();
        let payload = webhook_payload(serde_json::json!({
            "id": "wamid.abc",
            "from": "5511999998888",
            "timestamp": "1756200000",
            "type": "text",
            "text": { "body": "oi, quero fazer um pedido" }
        }));

        let messages = p.normalize(&payload);
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert_eq!(msg.platform_message_id, "wamid.abc");
        assert_eq!(msg.customer_phone, "5511999998888");
        assert_eq!(msg.customer_name.as_deref(), Some("Maria"));
        assert_eq!(msg.message_type, "text");
        assert_eq!(
            msg.content,
            MessageContent::Text {
                text: "oi, quero fazer um pedido".to_string()
            }
        );
        assert_eq!(msg.timestamp.timestamp(), 1756200000);
    }

    #[test]
    fn normalize_image_with_caption() {
        let p = platform();
        let payload = webhook_payload(serde_json::json!({
            "id": "wamid.img",
            "from": "5511999998888",
            "timestamp": "1756200000",
            "type": "image",
            "image": { "id": "media-1", "mime_type": "image/jpeg", "caption": "meu pedido" }
        }));

        let messages = p.normalize(&payload);
        assert_eq!(
            messages[0].content,
            MessageContent::Media {
                media_id: "media-1".to_string(),
                mime_type: Some("image/jpeg".to_string()),
                caption: Some("meu pedido".to_string()),
            }
        );
    }

    #[test]
    fn normalize_location_and_interactive() {
        let p = platform();
        let location = webhook_payload(serde_json::json!({
            "id": "wamid.loc",
            "from": "5511999998888",
            "type": "location",
            "location": { "latitude": -23.55, "longitude": -46.63, "address": "Av. Paulista" }
        }));
        assert_eq!(
            p.normalize(&location)[0].content,
            MessageContent::Location {
                latitude: -23.55,
                longitude: -46.63,
                address: Some("Av. Paulista".to_string()),
            }
        );

        let button = webhook_payload(serde_json::json!({
            "id": "wamid.btn",
            "from": "5511999998888",
            "type": "interactive",
            "interactive": {
                "type": "button_reply",
                "button_reply": { "id": "opt-1", "title": "Ver cardápio" }
            }
        }));
        assert_eq!(
            p.normalize(&button)[0].content,
            MessageContent::Interactive {
                title: "Ver cardápio".to_string()
            }
        );
    }

    #[test]
    fn normalize_unknown_type_keeps_message_with_empty_content() {
        let p = platform();
        let payload = webhook_payload(serde_json::json!({
            "id": "wamid.sticker",
            "from": "5511999998888",
            "type": "sticker"
        }));

        let messages = p.normalize(&payload);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, MessageContent::Empty);
        assert_eq!(messages[0].message_type, "sticker");
    }

    #[test]
    fn normalize_status_update_yields_nothing() {
        let p = platform();
        let payload = serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{ "id": "wamid.abc", "status": "delivered" }]
                    }
                }]
            }]
        });
        assert!(p.normalize(&payload).is_empty());
    }

    #[tokio::test]
    async fn send_posts_to_phone_number_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1029384756/messages"))
            .and(header("authorization", "Bearer EAAG-token"))
            .and(body_partial_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "5511999998888",
                "type": "text",
                "text": { "body": "Olá!" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": [{ "id": "wamid.out1" }]
            })))
            .mount(&server)
            .await;

        let p = platform().with_base_url(server.uri());
        let mut config = BotConfig::new("s1", Platform::Whatsapp);
        config.access_token = Some("EAAG-token".to_string());
        config.phone_number_id = Some("1029384756".to_string());

        let id = p.send(&config, "5511999998888", "Olá!").await.unwrap();
        assert_eq!(id.0, "wamid.out1");
    }

    #[tokio::test]
    async fn send_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let p = platform().with_base_url(server.uri());
        let mut config = BotConfig::new("s1", Platform::Whatsapp);
        config.access_token = Some("bad".to_string());
        config.phone_number_id = Some("1029384756".to_string());

        let err = p.send(&config, "5511999998888", "oi").await.unwrap_err();
        assert!(matches!(err, PedaiError::Channel { .. }));
    }

    #[tokio::test]
    async fn send_without_credentials_fails_fast() {
        let p = platform();
        let config = BotConfig::new("s1", Platform::Whatsapp);
        let err = p.send(&config, "5511999998888", "oi").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
