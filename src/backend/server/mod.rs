//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - configuration from the environment, database loading
//! - **`init`** - app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Store**: open SQLite, migrate, optionally seed demo users
//! 3. **Router Creation**: routes, auth middleware, tracing and CORS layers

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::{build_app, create_app};
pub use state::AppState;
