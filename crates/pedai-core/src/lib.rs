// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pedai multi-tenant messaging platform.
//!
//! Provides the error type, the shared domain types (stores, messages,
//! bot configuration, business hours), and the adapter traits implemented
//! by the platform and assistant crates.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PedaiError;
pub use types::{
    BotConfig, BotInfo, BusinessHours, ConnectionStatus, Direction, Message,
    MessageContent, NormalizedMessage, Platform, PlatformMessageId, StaffRole, Store,
    StoreStatus,
};

pub use traits::{AssistantContext, AssistantResponder, HistoryEntry, MessagingPlatform};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = PedaiError::Config("test".into());
        let _storage = PedaiError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = PedaiError::Channel {
            message: "test".into(),
            source: None,
        };
        let _assistant = PedaiError::Assistant {
            message: "test".into(),
            source: None,
        };
        let _auth = PedaiError::Auth("test".into());
        let _tenant = PedaiError::TenantNotFound("test".into());
        let _internal = PedaiError::Internal("test".into());
    }

    #[test]
    fn auth_error_message_is_verbatim() {
        // The Auth display must not add any prefix that could leak
        // which check failed.
        let err = PedaiError::Auth("invalid credentials".into());
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn platform_string_round_trip() {
        use std::str::FromStr;
        for p in [Platform::Whatsapp, Platform::Telegram] {
            let s = p.to_string();
            assert_eq!(Platform::from_str(&s).unwrap(), p);
        }
    }
}
