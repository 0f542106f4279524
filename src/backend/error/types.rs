/**
 * Backend Error Types
 *
 * This module defines the single error type returned by store functions and
 * HTTP handlers. Every variant maps to one HTTP status code.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - `Validation` - missing or malformed input (400)
 * - `Unauthorized` - missing/invalid token or bad credentials (401)
 * - `PermissionDenied` - the caller may not touch this row (403)
 * - `NotFound` - the referenced row does not exist (404)
 * - `Conflict` - the write would break a uniqueness or state rule (409)
 *
 * ## Server Errors
 *
 * - `Store` - sqlx failure, raw error text is surfaced to the client
 * - `Migration` - schema migration failure at startup
 * - `Token` / `PasswordHash` - JWT or bcrypt failure
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Which uniqueness or state rule a write ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A pending request for the same ordered pair exists
    DuplicateRequest,
    /// The users are already friends
    AlreadyFriends,
    /// The friend request was already resolved the other way
    RequestResolved,
    /// A pending or approved binding for the pair exists
    DuplicateBinding,
    UsernameTaken,
    EmailTaken,
}

impl ConflictKind {
    /// Default client-facing message
    pub fn message(&self) -> &'static str {
        match self {
            ConflictKind::DuplicateRequest => "Friend request already pending",
            ConflictKind::AlreadyFriends => "Already friends",
            ConflictKind::RequestResolved => "Friend request has already been resolved",
            ConflictKind::DuplicateBinding => "Binding request already exists",
            ConflictKind::UsernameTaken => "Username already exists",
            ConflictKind::EmailTaken => "Email already exists",
        }
    }
}

/// Backend error type
///
/// Store functions return `Result<T, BackendError>` and handlers propagate it
/// with `?`; the `IntoResponse` impl in `conversion` renders it.
///
/// # Usage
///
/// ```rust
/// use travelmate::backend::error::{BackendError, ConflictKind};
///
/// let err = BackendError::not_found("Friend request");
/// let err = BackendError::conflict(ConflictKind::DuplicateRequest);
/// let err = BackendError::validation("chatId", "chatId is required");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Invalid input, wraps the shared validation errors
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// Missing/invalid token or credentials
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// The caller is known but may not perform this action
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Human-readable error message
        message: String,
    },

    /// Referenced entity does not exist
    #[error("{entity} not found")]
    NotFound {
        /// Name of the missing entity, e.g. "Message"
        entity: &'static str,
    },

    /// Uniqueness or state rule violated
    #[error("Conflict: {message}")]
    Conflict {
        kind: ConflictKind,
        /// Human-readable error message
        message: String,
    },

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// JWT encoding/decoding failure outside of authentication checks
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// bcrypt failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl BackendError {
    /// Create a validation error for `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(SharedError::validation(field, message))
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a permission error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a not-found error
    ///
    /// # Arguments
    ///
    /// * `entity` - Capitalised entity name, rendered as "`entity` not found"
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a conflict error with the kind's default message
    pub fn conflict(kind: ConflictKind) -> Self {
        Self::Conflict {
            kind,
            message: kind.message().to_string(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 400 Bad Request (500 for serialization failures)
    /// - `Unauthorized` - 401 Unauthorized
    /// - `PermissionDenied` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::UnknownVariant { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Store(_) | Self::Migration(_) | Self::Token(_) | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message for the `message` field of the response
    pub fn message(&self) -> String {
        match self {
            Self::Validation(err) => err.client_message(),
            Self::Unauthorized { message } => message.clone(),
            Self::PermissionDenied { message } => message.clone(),
            Self::NotFound { .. } => self.to_string(),
            Self::Conflict { message, .. } => message.clone(),
            Self::Store(_) => "Database error".to_string(),
            Self::Migration(_) => "Database migration failed".to_string(),
            Self::Token(_) => "Token error".to_string(),
            Self::PasswordHash(_) => "Password processing failed".to_string(),
        }
    }

    /// Raw error detail for the optional `error` field
    ///
    /// Only server-side failures carry one.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Store(err) => Some(err.to_string()),
            Self::Migration(err) => Some(err.to_string()),
            Self::Token(err) => Some(err.to_string()),
            Self::PasswordHash(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Whether this is a unique-constraint violation reported by the store
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Store(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
