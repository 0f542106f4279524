//! Shared Error Types
//!
//! This module defines error types that are shared between request parsing
//! and the backend store. These errors represent input problems that are the
//! caller's fault and map to `400 Bad Request` at the HTTP boundary.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A required field is missing or malformed
//! - `UnknownVariant` - A string did not name a known enum value (message type, role, ...)
//!
//! # Usage
//!
//! ```rust
//! use travelmate::shared::error::SharedError;
//!
//! let error = SharedError::validation("chatId", "chatId is required");
//! ```
use thiserror::Error;

/// Input errors shared by the DTO layer and the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A string that should name an enum variant did not
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant {
        /// What was being parsed, e.g. "message type"
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the common "field is required" validation failure
    pub fn missing(field: &str) -> Self {
        Self::validation(field, format!("{} is required", field))
    }

    /// Create a new unknown-variant error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Message suitable for the `message` field of an error response
    pub fn client_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Unwrap a required request field or fail with a validation error
///
/// # Arguments
///
/// * `value` - The optional field as it arrived in the request
/// * `field` - Wire name of the field, used in the error message
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, SharedError> {
    value.ok_or_else(|| SharedError::missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_missing_field_message() {
        let error = SharedError::missing("chatId");
        assert_eq!(error.client_message(), "chatId is required");
        assert!(error.to_string().contains("'chatId'"));
    }

    #[test]
    fn test_unknown_variant_display() {
        let error = SharedError::unknown("message type", "video");
        assert_eq!(error.to_string(), "Unknown message type: 'video'");
        assert_eq!(error.client_message(), error.to_string());
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(7), "toId"), Ok(7));
        assert_eq!(require::<i64>(None, "toId"), Err(SharedError::missing("toId")));
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();

        match shared_error {
            SharedError::SerializationError { .. } => {}
            _ => panic!("Expected SerializationError from serde error"),
        }
    }
}
