// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Lisa assistant responder service.

pub mod client;

pub use client::LisaClient;
