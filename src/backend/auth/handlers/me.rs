/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the account behind the bearer token.
 *
 * # Authentication
 *
 * Mounted behind `auth_middleware`; the user arrives through `AuthUser`.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::backend::auth::handlers::types::UserView;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::store::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserView,
}

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing or invalid token (from the middleware)
/// * `404 Not Found` - the user vanished between middleware and handler
pub async fn get_me(
    State(db): State<Database>,
    AuthUser(auth): AuthUser,
) -> BackendResult<Json<MeResponse>> {
    let user = get_user_by_id(db.pool(), auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User"))?;

    Ok(Json(MeResponse {
        success: true,
        user: UserView::from(&user),
    }))
}
