//! # shvar Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout shvar. It provides
//! one typed error for the expansion engine and one application-level error
//! enum for everything the CLI does around it.
//!
//! ## Architecture
//!
//! The error system consists of three components:
//! - `ExpansionError`: The single error type produced by the expansion engine,
//!   carrying the failure kind, the offending variable name and a message.
//! - `ShvarError`: A `thiserror` enum covering configuration, filesystem,
//!   expansion, variable store and argument errors.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Pattern matching on the engine's failure kind
//! match expand::expand(template, &mut scope, &options) {
//!     Ok(text) => println!("{}", text),
//!     Err(ShvarError::Expansion { source }) if source.kind == ExpansionErrorKind::RequiredVariableMissing => {
//!         eprintln!("{}", source);
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use crate::common::store::StoreError;
use std::fmt;
use thiserror::Error;

/// The three ways a template can fail to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionErrorKind {
    /// A `${` without its closing `}`.
    UnterminatedReference,
    /// Something other than `}` or a known operator follows the name inside `${...}`.
    InvalidOperator,
    /// A `?` / `:?` reference whose variable is missing.
    RequiredVariableMissing,
}

impl fmt::Display for ExpansionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpansionErrorKind::UnterminatedReference => "unterminated reference",
            ExpansionErrorKind::InvalidOperator => "invalid operator",
            ExpansionErrorKind::RequiredVariableMissing => "required variable missing",
        };
        f.write_str(label)
    }
}

/// Error produced by the expansion engine.
///
/// `Display` renders the message alone, so a `${NAME:?message}` failure
/// prints exactly the operand the template author wrote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExpansionError {
    pub kind: ExpansionErrorKind,
    /// Variable the failing reference names (empty when no name could be read).
    pub name: String,
    pub message: String,
}

impl ExpansionError {
    pub fn unterminated(name: &str) -> Self {
        Self {
            kind: ExpansionErrorKind::UnterminatedReference,
            name: name.to_string(),
            message: format!("unterminated reference: missing '}}' after '${{{}'", name),
        }
    }

    pub fn invalid_operator(name: &str, token: &str) -> Self {
        let message = if name.is_empty() {
            format!("bad substitution: expected a variable name before '{}'", token)
        } else {
            format!("invalid operator '{}' in reference to '{}'", token, name)
        };
        Self {
            kind: ExpansionErrorKind::InvalidOperator,
            name: name.to_string(),
            message,
        }
    }

    pub fn required(name: &str, message: String) -> Self {
        Self {
            kind: ExpansionErrorKind::RequiredVariableMissing,
            name: name.to_string(),
            message,
        }
    }
}

/// Custom error type for the shvar application.
#[derive(Error, Debug)]
pub enum ShvarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("{source}")]
    Expansion {
        #[from]
        source: ExpansionError,
    },

    #[error("Variable store error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ShvarError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let required = ExpansionError::required("HOST", "set HOST first".to_string());
        assert_eq!(required.to_string(), "set HOST first");
        assert_eq!(ShvarError::from(required).to_string(), "set HOST first");

        let store_err = ShvarError::from(StoreError::NotUnicode {
            name: "WEIRD".into(),
        });
        assert_eq!(
            store_err.to_string(),
            "Variable store error: value of 'WEIRD' is not valid Unicode"
        );
    }

    #[test]
    fn test_expansion_error_fields() {
        let err = ExpansionError::unterminated("FOO");
        assert_eq!(err.kind, ExpansionErrorKind::UnterminatedReference);
        assert_eq!(err.name, "FOO");
        assert_eq!(err.to_string(), "unterminated reference: missing '}' after '${FOO'");

        let err = ExpansionError::invalid_operator("FOO", ":b");
        assert_eq!(err.kind, ExpansionErrorKind::InvalidOperator);
        assert_eq!(err.to_string(), "invalid operator ':b' in reference to 'FOO'");

        let err = ExpansionError::invalid_operator("", "}");
        assert!(err.to_string().starts_with("bad substitution"));
        assert_eq!(ExpansionErrorKind::InvalidOperator.to_string(), "invalid operator");
    }
}
