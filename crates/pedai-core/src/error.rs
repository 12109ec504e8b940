// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pedai messaging platform.

use thiserror::Error;

/// The primary error type used across all Pedai crates.
#[derive(Debug, Error)]
pub enum PedaiError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging platform errors (send failure, malformed payload, API rejection).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Assistant responder errors (proxy unreachable, upstream failure).
    #[error("assistant error: {message}")]
    Assistant {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication or authorization failure.
    ///
    /// The message is intentionally generic: callers must not be able to
    /// distinguish a bad signature from a suspended store.
    #[error("{0}")]
    Auth(String),

    /// No tenant could be resolved for the request.
    #[error("tenant not identified: {0}")]
    TenantNotFound(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PedaiError {
    /// Wraps any error as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
