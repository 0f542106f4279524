/**
 * Server Initialization
 *
 * This module builds the Axum application from a `ServerConfig`:
 * 1. Open the SQLite store and run migrations
 * 2. Seed the demo accounts when enabled
 * 3. Create the router around the resulting `AppState`
 *
 * Tests skip step 1 and hand an in-memory `Database` to `build_app`.
 */

use axum::Router;

use crate::backend::error::BackendResult;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::Database;

/// Create and configure the Axum application
///
/// # Returns
///
/// The router and the state it serves, so the caller can close the store
/// on shutdown.
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated.
pub async fn create_app(config: ServerConfig) -> BackendResult<(Router, AppState)> {
    tracing::info!("Initializing TravelMate backend server");

    let db = load_database(&config).await?;
    let app_state = AppState::new(db, config);
    let app = create_router(app_state.clone());

    tracing::info!("Router configured");
    Ok((app, app_state))
}

/// Build the router around an already opened store
pub fn build_app(db: Database, config: ServerConfig) -> Router {
    create_router(AppState::new(db, config))
}
