// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pedai platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Pedai configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PedaiConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Staff-token signing and tenant resolution settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Assistant responder proxy settings.
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Staff-token signing and tenant resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for staff-token signatures. `None` disables token
    /// issuance and bearer resolution (the server refuses to start
    /// without it in serve mode).
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Staff token validity window in days.
    #[serde(default = "default_token_ttl_days")]
    pub staff_token_ttl_days: u64,

    /// Base URL used when building shareable staff access links.
    #[serde(default = "default_frontend_base_url")]
    pub frontend_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            staff_token_ttl_days: default_token_ttl_days(),
            frontend_base_url: default_frontend_base_url(),
        }
    }
}

fn default_token_ttl_days() -> u64 {
    30
}

fn default_frontend_base_url() -> String {
    "http://localhost:5173".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pedai").join("pedai.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("pedai.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Assistant responder proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Enable assistant dispatch. When false, inbound messages are
    /// persisted but never forwarded to the responder.
    #[serde(default = "default_assistant_enabled")]
    pub enabled: bool,

    /// Base URL of the assistant HTTP service.
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,

    /// Bearer token for the assistant service, if it requires one.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds for responder calls. This is the only
    /// timeout budget in the pipeline; a hung responder holds the
    /// webhook request until it fires.
    #[serde(default = "default_assistant_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: default_assistant_enabled(),
            base_url: default_assistant_base_url(),
            api_key: None,
            timeout_secs: default_assistant_timeout_secs(),
        }
    }
}

fn default_assistant_enabled() -> bool {
    true
}

fn default_assistant_base_url() -> String {
    "http://localhost:8600".to_string()
}

fn default_assistant_timeout_secs() -> u64 {
    30
}
