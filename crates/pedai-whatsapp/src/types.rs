// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the WhatsApp Business Cloud API (Graph API v18.0).
//!
//! Webhook payloads arrive as `entry[].changes[].value` envelopes. Only the
//! fields the pipeline reads are modeled; everything else is ignored on
//! deserialization.

use serde::{Deserialize, Serialize};

// --- Webhook (inbound) ---

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub contacts: Vec<WaContact>,
    /// Absent for status-update events.
    #[serde(default)]
    pub messages: Vec<WaMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WaContact {
    pub wa_id: Option<String>,
    pub profile: Option<WaProfile>,
}

#[derive(Debug, Deserialize)]
pub struct WaProfile {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaMessage {
    pub id: String,
    pub from: String,
    /// Unix seconds, as a decimal string.
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: Option<WaText>,
    pub image: Option<WaMedia>,
    pub audio: Option<WaMedia>,
    pub video: Option<WaMedia>,
    pub document: Option<WaMedia>,
    pub location: Option<WaLocation>,
    pub interactive: Option<WaInteractive>,
}

#[derive(Debug, Deserialize)]
pub struct WaText {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct WaMedia {
    pub id: String,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaInteractive {
    #[serde(rename = "type")]
    pub interactive_type: Option<String>,
    pub button_reply: Option<WaReply>,
    pub list_reply: Option<WaReply>,
}

#[derive(Debug, Deserialize)]
pub struct WaReply {
    pub title: String,
}

// --- Send (outbound) ---

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub text: SendText<'a>,
}

#[derive(Debug, Serialize)]
pub struct SendText<'a> {
    pub body: &'a str,
}

impl<'a> SendMessageRequest<'a> {
    pub fn text(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: SendText { body },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub id: String,
}
