// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pedai.toml` > `~/.config/pedai/pedai.toml` >
//! `/etc/pedai/pedai.toml` with environment variable overrides via the
//! `PEDAI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PedaiConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pedai/pedai.toml` (system-wide)
/// 3. `~/.config/pedai/pedai.toml` (user XDG config)
/// 4. `./pedai.toml` (local directory)
/// 5. `PEDAI_*` environment variables
pub fn load_config() -> Result<PedaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PedaiConfig::default()))
        .merge(Toml::file("/etc/pedai/pedai.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pedai/pedai.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pedai.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PedaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PedaiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PedaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PedaiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PEDAI_AUTH_JWT_SECRET` must map to
/// `auth.jwt_secret`, not `auth.jwt.secret`.
fn env_provider() -> Env {
    Env::prefixed("PEDAI_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("assistant_", "assistant.", 1);
        mapped.into()
    })
}
