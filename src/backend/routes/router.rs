/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Protected routes (bearer JWT via `auth_middleware`)
 * 2. Public API routes
 * 3. JSON 404 fallback
 *
 * Tracing and CORS layers wrap everything.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::auth::{get_me, list_users, process_reset, reset_requests};
use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Store handle and configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected: Router<AppState> = Router::new()
        .route("/api/users", get(list_users))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/reset-requests", get(reset_requests))
        .route("/api/auth/process-reset", post(process_reset))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let router = configure_api_routes(Router::new()).merge(protected);

    let router = router.fallback(|| async { BackendError::not_found("Route") });

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
