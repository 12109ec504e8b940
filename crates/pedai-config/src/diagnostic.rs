// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! "did you mean?" suggestions using Jaro-Winkler string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `jwt_secert` -> `jwt_secret` while
/// filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(pedai::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A semantic validation failure after deserialization.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(pedai::config::validation))]
    Validation { message: String },

    /// Any other Figment parse/merge error, passed through.
    #[error("{message}")]
    #[diagnostic(code(pedai::config::parse))]
    Parse { message: String },
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a Figment error chain into diagnostic [`ConfigError`]s.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut out = Vec::new();

    for e in err {
        match &e.kind {
            figment::error::Kind::UnknownField(field, expected) => {
                // expected is &'static [&'static str]
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                out.push(ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                });
            }
            _ => {
                out.push(ConfigError::Parse {
                    message: e.to_string(),
                });
            }
        }
    }

    out
}

/// Suggest the closest valid key for an unknown one, if any scores above
/// the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render all errors to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_match() {
        let valid = &["host", "port", "log_level"];
        assert_eq!(suggest_key("prot", valid), Some("port".to_string()));
        assert_eq!(suggest_key("log_levl", valid), Some("log_level".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_key() {
        let valid = &["host", "port", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn unknown_key_help_includes_suggestion() {
        let help = format_unknown_key_help(Some("port"), "host, port");
        assert!(help.contains("did you mean `port`"));
        assert!(help.contains("host, port"));
    }
}
