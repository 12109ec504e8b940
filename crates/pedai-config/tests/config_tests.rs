// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Pedai configuration system.

use pedai_config::diagnostic::suggest_key;
use pedai_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_pedai_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[auth]
jwt_secret = "super-secret"
staff_token_ttl_days = 7
frontend_base_url = "https://app.pedai.com"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[assistant]
enabled = false
base_url = "http://lisa.internal:8600"
timeout_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.auth.jwt_secret.as_deref(), Some("super-secret"));
    assert_eq!(config.auth.staff_token_ttl_days, 7);
    assert_eq!(config.auth.frontend_base_url, "https://app.pedai.com");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.assistant.enabled);
    assert_eq!(config.assistant.timeout_secs, 10);
}

/// Unknown field in a section produces a deserialization error.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[server]
prot = 8080
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.log_level, "info");
    assert!(config.auth.jwt_secret.is_none());
    assert_eq!(config.auth.staff_token_ttl_days, 30);
    assert!(config.storage.wal_mode);
    assert!(config.assistant.enabled);
    assert_eq!(config.assistant.timeout_secs, 30);
}

/// Validation failures are reported as diagnostics, not panics.
#[test]
fn invalid_values_are_collected() {
    let toml = r#"
[auth]
staff_token_ttl_days = 0

[assistant]
timeout_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
}

/// The unknown-key fuzzy matcher suggests a close valid key.
#[test]
fn typo_suggestion_works() {
    let valid = &["jwt_secret", "staff_token_ttl_days", "frontend_base_url"];
    assert_eq!(
        suggest_key("jwt_secert", valid),
        Some("jwt_secret".to_string())
    );
}
