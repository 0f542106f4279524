/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the `Database` handle (SQLite pool)
 * - the immutable `ServerConfig`
 *
 * Both are cheap to clone: the pool is reference counted internally and the
 * config sits behind an `Arc`.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only what they need:
 *
 * ```rust,ignore
 * async fn handler(State(db): State<Database>) { /* ... */ }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::server::config::ServerConfig;
use crate::backend::store::Database;

/// Application state shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// Persistent store
    pub db: Database,

    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Implement FromRef for Database
///
/// This allows Axum handlers to extract the store directly from `AppState`
/// using `State(Database)`.
impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

/// Implement FromRef for the server configuration
impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
