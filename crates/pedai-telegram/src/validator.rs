// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot token validation.
//!
//! A token is validated by calling `getMe` against the Bot API. The format
//! check runs first so obviously malformed tokens fail without a network
//! round trip.

use pedai_core::types::BotInfo;
use pedai_core::PedaiError;
use teloxide::prelude::*;
use tracing::debug;

/// Structural check for a Telegram bot token: `<numeric id>:<secret>`.
pub fn is_well_formed(token: &str) -> bool {
    match token.split_once(':') {
        Some((id, secret)) => {
            !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
        }
        None => false,
    }
}

/// Validate a bot token against the Telegram API.
///
/// Returns the bot's identity on success.
pub async fn validate_token(token: &str) -> Result<BotInfo, PedaiError> {
    if !is_well_formed(token) {
        return Err(PedaiError::Channel {
            message: "malformed telegram bot token".to_string(),
            source: None,
        });
    }

    let bot = Bot::new(token);
    let me = bot.get_me().await.map_err(|e| PedaiError::Channel {
        message: format!("telegram token validation failed: {e}"),
        source: Some(Box::new(e)),
    })?;

    debug!(bot_id = me.id.0, username = %me.username(), "telegram token validated");

    Ok(BotInfo {
        id: me.id.0 as i64,
        is_bot: me.is_bot,
        first_name: me.first_name.clone(),
        username: me.username.clone(),
        can_join_groups: me.can_join_groups,
        can_read_all_group_messages: me.can_read_all_group_messages,
        supports_inline_queries: me.supports_inline_queries,
    })
}
