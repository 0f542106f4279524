/**
 * API Route Handlers
 *
 * This module wires the public `/api` endpoints:
 * - Accounts (register, login, search, stats, profile update)
 * - Friend requests and friends
 * - Chat sessions and messages
 * - Tourist/guide bindings
 * - Surveys, feedback and itineraries
 * - Health check
 *
 * Routes that need a bearer token are assembled in `router.rs` behind
 * `auth_middleware`.
 */

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::backend::auth::{
    forgot_password, login, register, search_users, update_profile, user_stats,
};
use crate::backend::error::BackendResult;
use crate::backend::{feedback, guide, itinerary, survey};
use crate::backend::messaging::handlers::{
    accept_friend_request, add_friend, delete_message, get_message, get_or_create_private_chat,
    list_chats, list_friend_requests, list_friends, list_messages, mark_read,
    reject_friend_request, remove_friend, send_friend_request, send_message, unread_count,
};
use crate::backend::server::state::AppState;
use crate::backend::store::Database;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
}

/// Liveness check that also pings the store
pub async fn health(State(db): State<Database>) -> BackendResult<Json<HealthResponse>> {
    db.ping().await?;
    Ok(Json(HealthResponse {
        success: true,
        status: "ok",
    }))
}

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with the public API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/health", get(health))
        // Account endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/users/stats", get(user_stats))
        .route("/api/users/search", get(search_users))
        .route("/api/user/update_profile", post(update_profile))
        // Friend endpoints
        .route("/api/friends", get(list_friends))
        .route("/api/friends/request", post(send_friend_request))
        .route("/api/friends/requests", get(list_friend_requests))
        .route("/api/friends/accept", post(accept_friend_request))
        .route("/api/friends/reject", post(reject_friend_request))
        .route("/api/friends/add", post(add_friend))
        .route("/api/friends/{friend_id}", delete(remove_friend))
        // Chat endpoints
        .route("/api/chats", get(list_chats))
        .route("/api/chats/private", post(get_or_create_private_chat))
        // Message endpoints
        .route("/api/messages", get(list_messages))
        .route("/api/messages/send", post(send_message))
        .route("/api/messages/read", post(mark_read))
        .route("/api/messages/unread", get(unread_count))
        .route(
            "/api/messages/{message_id}",
            get(get_message).delete(delete_message),
        )
        // Guide binding endpoints
        .route("/api/bind_guide", post(guide::bind_guide))
        .route("/api/review_bind_request", post(guide::review_bind_request))
        .route("/api/unbind_guide", post(guide::unbind_guide))
        .route("/api/binding/guide/{tourist_id}", get(guide::binding_for_tourist))
        .route("/api/binding/pending/{guide_id}", get(guide::pending_for_guide))
        .route("/api/binding/tourists/{guide_id}", get(guide::tourists_for_guide))
        .route("/api/binding/cleanup", post(guide::cleanup_bindings))
        // Survey endpoints
        .route("/api/survey/submit", post(survey::submit_survey))
        .route("/api/survey/stats", get(survey::survey_stats))
        // Feedback endpoints
        .route("/api/feedback/submit", post(feedback::submit_feedback))
        .route("/api/feedback/list", get(feedback::list_feedback))
        .route("/api/feedback/stats", get(feedback::feedback_stats))
        .route("/api/feedback/{feedback_id}/process", post(feedback::process_feedback))
        .route("/api/feedbacks/user/{user_id}/rewards", get(feedback::user_rewards))
        // Itinerary endpoints
        .route(
            "/api/itinerary",
            get(itinerary::get_itinerary)
                .post(itinerary::save_itinerary)
                .delete(itinerary::delete_itinerary),
        )
}
