//! Backend Error Module
//!
//! This module defines the error type shared by the store layer and the HTTP
//! handlers, and its conversion into JSON error responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, ConflictKind};

/// Result alias used across the backend
pub type BackendResult<T> = Result<T, BackendError>;
