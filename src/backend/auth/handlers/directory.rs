/**
 * User Directory Handlers
 *
 * Listing, statistics, search and profile updates.
 *
 * # Routes
 *
 * - `GET /api/users` - all users (requires JWT)
 * - `GET /api/users/stats` - account counters
 * - `GET /api/users/search?keyword=&role=` - username search
 * - `POST /api/user/update_profile` - change username/avatar
 */

use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{
    ListUsersResponse, SearchUsersParams, SearchUsersResponse, UpdateProfileRequest,
    UserStatsResponse, UserView,
};
use crate::backend::auth::users;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::{ActionResponse, UserRole};

/// List every user, newest first
pub async fn list_users(
    State(db): State<Database>,
    AuthUser(auth): AuthUser,
) -> BackendResult<Json<ListUsersResponse>> {
    tracing::debug!("User list requested by {}", auth.username);
    let users = users::list_users(db.pool()).await?;

    Ok(Json(ListUsersResponse {
        success: true,
        users: users.iter().map(UserView::from).collect(),
    }))
}

/// Account counters
pub async fn user_stats(State(db): State<Database>) -> BackendResult<Json<UserStatsResponse>> {
    let stats = users::user_stats(db.pool()).await?;
    Ok(Json(UserStatsResponse {
        success: true,
        stats,
    }))
}

/// Search users by username substring and optional role
pub async fn search_users(
    State(db): State<Database>,
    Query(params): Query<SearchUsersParams>,
) -> BackendResult<Json<SearchUsersResponse>> {
    let keyword = params.keyword.unwrap_or_default();
    let role = match params.role.as_deref() {
        Some(role) if !role.is_empty() => Some(UserRole::parse(role)?),
        _ => None,
    };

    let found = users::search_users(db.pool(), keyword.trim(), role).await?;
    Ok(Json(SearchUsersResponse {
        success: true,
        users: found,
    }))
}

/// Update username and/or avatar
pub async fn update_profile(
    State(db): State<Database>,
    Json(request): Json<UpdateProfileRequest>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(request.user_id, "userId")?;
    let username = request.username.as_deref().map(str::trim);

    let user = users::update_profile(db.pool(), user_id, username, request.avatar.as_deref())
        .await?;
    tracing::info!("Profile updated for user {}", user.id);

    Ok(Json(ActionResponse::ok("Profile updated")))
}
