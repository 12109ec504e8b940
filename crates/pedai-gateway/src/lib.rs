// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Pedai messaging platform.
//!
//! Exposes the platform webhooks, the tenant-scoped `/v1` REST API, and
//! the inbound message pipeline that drives assistant auto-replies.

pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod server;
pub mod state;
pub mod tenant;

pub use server::{router, start_server};
pub use state::AppState;
