// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API adapter for the Pedai platform.

pub mod adapter;
pub mod validator;

pub use adapter::TelegramPlatform;
pub use validator::validate_token;
