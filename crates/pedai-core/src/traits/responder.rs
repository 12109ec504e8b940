// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant responder trait and the context object handed to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PedaiError;

/// One prior message in the conversation, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub direction: String,
    pub content: String,
    pub timestamp: String,
}

/// Context assembled by the gateway for each assistant dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantContext {
    pub store_id: String,
    pub current_message: String,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    /// Last 10 messages of the conversation, chronological order.
    pub history: Vec<HistoryEntry>,
    pub welcome_message: String,
}

/// Produces a reply for an inbound customer message.
///
/// Implementations may call out over the network; the gateway treats any
/// error as "responder unavailable" and falls back to the tenant's
/// welcome message.
#[async_trait]
pub trait AssistantResponder: Send + Sync {
    async fn respond(&self, ctx: &AssistantContext) -> Result<String, PedaiError>;
}
