//! Error types for the POI editor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a single field value was rejected by its parser.
///
/// Field errors never change the draft; the session re-prompts for the same
/// attribute with a message chosen from the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    #[error("value is shorter than {min} characters")]
    TooShort { min: usize },

    #[error("not a coordinate pair")]
    MalformedCoordinate,

    #[error("location is outside of the configured area")]
    OutOfBounds,

    #[error("malformed tag: {0}")]
    MalformedTag(String),

    /// Carries the clause that failed to match the hours grammar.
    #[error("malformed opening hours clause: {0}")]
    MalformedHours(String),

    #[error("value is empty")]
    Empty,

    #[error("floor '{0}' is not known for this house")]
    UnknownFloor(String),

    /// Input kind the attribute does not take, e.g. text for a choice
    #[error("expected one of the offered options")]
    UnexpectedInput,
}

/// A shared error type for the whole editor.
///
/// Every variant is recoverable at the session level: the worst outcome of
/// any error is an abandoned session.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PoiError {
    /// User input failed a field contract
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// Referenced entity not found
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Catalog store or photo store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Event does not fit the current session state
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PoiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns the field error if this is a validation failure.
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PoiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PoiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PoiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PoiError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PoiError>`.
pub type Result<T> = std::result::Result<T, PoiError>;
