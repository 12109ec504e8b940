// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::PedaiConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &PedaiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(ref secret) = config.auth.jwt_secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "auth.jwt_secret must not be empty when set".to_string(),
        });
    }

    if config.auth.staff_token_ttl_days == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.staff_token_ttl_days must be at least 1".to_string(),
        });
    }

    if config.assistant.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "assistant.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.assistant.enabled && config.assistant.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "assistant.base_url must not be empty when assistant.enabled"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
