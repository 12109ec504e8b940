// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. All functions accept `&Database` and route through
//! the single-writer connection.

pub mod bot_configs;
pub mod messages;
pub mod stores;
