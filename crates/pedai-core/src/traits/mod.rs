// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the pluggable seams of the message pipeline.
//!
//! Platform adapters and the assistant responder use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod platform;
pub mod responder;

pub use platform::MessagingPlatform;
pub use responder::{AssistantContext, AssistantResponder, HistoryEntry};
