// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical row types are defined in `pedai-core::types` for use across
//! crate boundaries. This module re-exports them and adds the aggregate
//! shapes produced by reporting queries.

use serde::Serialize;

pub use pedai_core::types::{BotConfig, Message, Store};

/// One entry in the active-conversations listing: the most recent message
/// exchanged with a customer plus their total message count.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub customer_phone: String,
    pub customer_name: Option<String>,
    /// JSON-encoded message content of the latest message.
    pub last_content: String,
    pub last_direction: String,
    pub last_message_at: String,
    pub message_count: i64,
}

/// Aggregated message counters for a store over a reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct MessageStats {
    pub total: i64,
    pub inbound: i64,
    pub outbound: i64,
    pub assistant_processed: i64,
    pub unique_customers: i64,
}
