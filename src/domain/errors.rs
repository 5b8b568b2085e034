//! Domain error types
//!
//! This module defines the error hierarchy for Hattori. Errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Hattori error type
///
/// This is the primary error type used throughout the library. Runner,
/// store and configuration failures all surface through it.
#[derive(Debug, Error)]
pub enum HattoriError {
    /// Configuration-related errors (missing model, empty attributes, bad TOML)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured replacer is neither a generator nor a string literal
    #[error("Replacers need to be generators or strings: field '{field}' has {found}")]
    ReplacerType {
        /// Field the replacer was configured for
        field: String,
        /// Description of the offending value
        found: String,
    },

    /// A field is not part of the model metadata
    #[error("Field '{field}' does not exist on model '{model}'")]
    UnknownField {
        /// Model (table) name
        model: String,
        /// Missing field name
        field: String,
    },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl HattoriError {
    /// Creates a replacer type error for a field
    pub fn replacer_type(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ReplacerType {
            field: field.into(),
            found: found.into(),
        }
    }

    /// Whether this error means the run never should have started
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for HattoriError {
    fn from(err: std::io::Error) -> Self {
        HattoriError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HattoriError {
    fn from(err: serde_json::Error) -> Self {
        HattoriError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HattoriError {
    fn from(err: toml::de::Error) -> Self {
        HattoriError::Configuration(format!("TOML parse error: {err}"))
    }
}
