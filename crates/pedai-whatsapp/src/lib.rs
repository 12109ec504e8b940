// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Business Cloud API adapter for the Pedai platform.

pub mod adapter;
pub mod types;

pub use adapter::WhatsAppPlatform;
