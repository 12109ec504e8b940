// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the platform adapters and the Pedai gateway.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier assigned to a message by the external platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformMessageId(pub String);

/// Lifecycle status of a store (tenant).
///
/// Stores are never hard-deleted; deactivation flips the status to
/// `Suspended` and the tenant resolver rejects its credentials from then on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Active,
    Suspended,
    Pending,
}

/// Front-of-house staff role embedded in access tokens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StaffRole {
    Waiter,
    CounterAttendant,
}

/// Direction of a stored message relative to the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Messaging platform a store is connected to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Whatsapp,
    Telegram,
}

/// Connection state reported on a store's bot configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Uniform content record extracted from heterogeneous platform payloads.
///
/// Unrecognized platform types map to [`MessageContent::Empty`] rather than
/// an error: inbound messages are never dropped for unknown type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Media {
        media_id: String,
        mime_type: Option<String>,
        caption: Option<String>,
    },
    Location {
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    },
    /// Button or list reply; the selected option's title.
    Interactive {
        title: String,
    },
    Empty,
}

impl MessageContent {
    /// Text representation used for assistant context and conversation
    /// summaries. Non-textual content collapses to a placeholder.
    pub fn display_text(&self) -> String {
        match self {
            MessageContent::Text { text } => text.clone(),
            MessageContent::Interactive { title } => title.clone(),
            MessageContent::Media { caption, .. } => caption
                .clone()
                .unwrap_or_else(|| "[media]".to_string()),
            MessageContent::Location { .. } => "[location]".to_string(),
            MessageContent::Empty => String::new(),
        }
    }
}

/// A platform message normalized into the shared content model.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    /// Platform-assigned unique message id (idempotency key).
    pub platform_message_id: String,
    /// Customer phone number (WhatsApp) or chat id (Telegram).
    pub customer_phone: String,
    /// Display name, when the platform reports one.
    pub customer_name: Option<String>,
    /// The platform-reported type string, kept verbatim for storage.
    pub message_type: String,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

/// Builds the conversation key for a (store, customer) pair.
pub fn conversation_id(store_id: &str, customer_phone: &str) -> String {
    format!("{store_id}:{customer_phone}")
}

// --- Storage row models ---

/// A store (tenant) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub status: StoreStatus,
    pub owner: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Store {
    pub fn is_active(&self) -> bool {
        self.status == StoreStatus::Active
    }
}

/// A persisted conversation message.
///
/// Immutable after creation except for `status` transitions
/// (sent -> delivered -> read, or -> failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub store_id: String,
    pub conversation_id: String,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub platform: String,
    pub platform_message_id: String,
    pub direction: String,
    pub message_type: String,
    /// JSON-encoded [`MessageContent`].
    pub content: String,
    pub status: String,
    /// Whether the assistant produced a reply for this inbound message.
    pub assistant_reply: bool,
    pub created_at: String,
}

impl Message {
    /// Decodes the stored content payload.
    pub fn content(&self) -> MessageContent {
        serde_json::from_str(&self.content).unwrap_or(MessageContent::Empty)
    }
}

/// Per-tenant bot configuration, one row per store, upserted on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub store_id: String,
    pub platform: Platform,
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
    pub webhook_verify_token: Option<String>,
    pub auto_reply: bool,
    pub welcome_message: String,
    pub business_hours: BusinessHours,
    pub connection_status: ConnectionStatus,
    pub updated_at: String,
}

impl BotConfig {
    /// A fresh configuration for a store with platform defaults.
    pub fn new(store_id: &str, platform: Platform) -> Self {
        Self {
            store_id: store_id.to_string(),
            platform,
            access_token: None,
            phone_number_id: None,
            webhook_verify_token: None,
            auto_reply: true,
            welcome_message: default_welcome_message(),
            business_hours: BusinessHours::default(),
            connection_status: ConnectionStatus::Disconnected,
            updated_at: Utc::now().to_rfc3339(),
        }
    }
}

fn default_welcome_message() -> String {
    "Olá! Sou a Lisa, sua assistente virtual. Como posso ajudá-lo hoje?".to_string()
}

// --- Business hours ---

/// Opening window for one weekday, times as "HH:MM" local strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub opens: String,
    #[serde(default)]
    pub closes: String,
    #[serde(default)]
    pub active: bool,
}

/// Weekly opening schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(default)]
    pub monday: DaySchedule,
    #[serde(default)]
    pub tuesday: DaySchedule,
    #[serde(default)]
    pub wednesday: DaySchedule,
    #[serde(default)]
    pub thursday: DaySchedule,
    #[serde(default)]
    pub friday: DaySchedule,
    #[serde(default)]
    pub saturday: DaySchedule,
    #[serde(default)]
    pub sunday: DaySchedule,
}

impl WeekSchedule {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

/// Business-hours gate for assistant auto-replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub schedule: WeekSchedule,
    #[serde(default = "default_outside_hours_message")]
    pub outside_hours_message: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule: WeekSchedule::default(),
            outside_hours_message: default_outside_hours_message(),
        }
    }
}

fn default_outside_hours_message() -> String {
    "Obrigado pelo contato! Nosso horário de atendimento é de segunda a sexta, \
     das 9h às 18h. Retornaremos assim que possível."
        .to_string()
}

impl BusinessHours {
    /// Whether the store is open at the given weekday and "HH:MM" local time.
    ///
    /// When the gate is disabled the store is always considered open.
    /// A day with `active == false` is closed regardless of times.
    /// Boundaries are inclusive, matching lexicographic "HH:MM" comparison.
    pub fn is_open_at(&self, weekday: Weekday, hhmm: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let day = self.schedule.day(weekday);
        if !day.active {
            return false;
        }
        day.opens.as_str() <= hhmm && hhmm <= day.closes.as_str()
    }
}

// --- Telegram bot identity ---

/// Identity returned by a Telegram `getMe` call during token validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
    #[serde(default)]
    pub can_join_groups: bool,
    #[serde(default)]
    pub can_read_all_group_messages: bool,
    #[serde(default)]
    pub supports_inline_queries: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(opens: &str, closes: &str) -> BusinessHours {
        let day = DaySchedule {
            opens: opens.to_string(),
            closes: closes.to_string(),
            active: true,
        };
        BusinessHours {
            enabled: true,
            schedule: WeekSchedule {
                monday: day.clone(),
                tuesday: day.clone(),
                wednesday: day.clone(),
                thursday: day.clone(),
                friday: day,
                ..WeekSchedule::default()
            },
            outside_hours_message: "fechado".to_string(),
        }
    }

    #[test]
    fn disabled_gate_is_always_open() {
        let bh = BusinessHours::default();
        assert!(bh.is_open_at(Weekday::Sun, "03:00"));
    }

    #[test]
    fn open_within_window() {
        let bh = hours("09:00", "18:00");
        assert!(bh.is_open_at(Weekday::Mon, "09:00"));
        assert!(bh.is_open_at(Weekday::Mon, "12:30"));
        assert!(bh.is_open_at(Weekday::Mon, "18:00"));
    }

    #[test]
    fn closed_outside_window() {
        let bh = hours("09:00", "18:00");
        assert!(!bh.is_open_at(Weekday::Mon, "08:59"));
        assert!(!bh.is_open_at(Weekday::Mon, "22:00"));
    }

    #[test]
    fn inactive_day_is_closed() {
        let bh = hours("09:00", "18:00");
        // Saturday defaults to inactive in the helper.
        assert!(!bh.is_open_at(Weekday::Sat, "12:00"));
    }

    #[test]
    fn conversation_id_joins_store_and_phone() {
        assert_eq!(conversation_id("store-1", "5511999998888"), "store-1:5511999998888");
    }

    #[test]
    fn staff_role_string_round_trip() {
        assert_eq!(StaffRole::Waiter.to_string(), "waiter");
        assert_eq!(StaffRole::CounterAttendant.to_string(), "counter-attendant");
        assert_eq!(
            "counter-attendant".parse::<StaffRole>().unwrap(),
            StaffRole::CounterAttendant
        );
    }

    #[test]
    fn content_display_text() {
        let text = MessageContent::Text {
            text: "oi".to_string(),
        };
        assert_eq!(text.display_text(), "oi");

        let media = MessageContent::Media {
            media_id: "m1".to_string(),
            mime_type: Some("image/jpeg".to_string()),
            caption: None,
        };
        assert_eq!(media.display_text(), "[media]");

        assert_eq!(MessageContent::Empty.display_text(), "");
    }

    #[test]
    fn content_json_round_trip() {
        let content = MessageContent::Location {
            latitude: -23.55,
            longitude: -46.63,
            address: Some("Av. Paulista".to_string()),
        };
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"kind\":\"location\""));
        let back: MessageContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn message_content_decodes_garbage_as_empty() {
        let msg = Message {
            id: "m1".to_string(),
            store_id: "s1".to_string(),
            conversation_id: "s1:123".to_string(),
            customer_phone: "123".to_string(),
            customer_name: None,
            platform: "whatsapp".to_string(),
            platform_message_id: "wamid.1".to_string(),
            direction: "inbound".to_string(),
            message_type: "text".to_string(),
            content: "not json".to_string(),
            status: "received".to_string(),
            assistant_reply: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        assert_eq!(msg.content(), MessageContent::Empty);
    }
}
