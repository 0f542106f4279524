/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by username (or by email when the input contains '@')
 * 2. Verify password using bcrypt
 * 3. Refuse disabled accounts
 * 4. Generate a 7-day JWT token
 *
 * # Security
 *
 * - Unknown user and wrong password return the same 401 message
 * - Passwords are never logged or returned in responses
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse, UserView};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::ServerConfig;
use crate::backend::store::Database;
use crate::shared::error::require;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - username or password missing
/// * `401 Unauthorized` - unknown user, wrong password, or disabled account
/// * `500 Internal Server Error` - store, bcrypt or token failure
pub async fn login(
    State(db): State<Database>,
    State(config): State<Arc<ServerConfig>>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<LoginResponse>> {
    let username = require(request.username, "username")?;
    let password = require(request.password, "password")?;
    tracing::info!("Login request for: {}", username);

    let user = if username.contains('@') {
        get_user_by_email(db.pool(), &username).await?
    } else {
        get_user_by_username(db.pool(), &username).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", username);
        BackendError::unauthorized(BAD_CREDENTIALS)
    })?;

    if !verify(&password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", username);
        return Err(BackendError::unauthorized(BAD_CREDENTIALS));
    }

    if !user.is_active {
        tracing::warn!("Login attempt on disabled account: {}", username);
        return Err(BackendError::unauthorized("Account is disabled"));
    }

    let token = create_token(&config.jwt_secret, &user)?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.id);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserView::from(&user),
        token,
    }))
}
