// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

pub mod bot_config;
pub mod health;
pub mod messages;
pub mod staff;
pub mod webhooks;
