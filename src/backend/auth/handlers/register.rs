/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate username, email, password and role
 * 2. Hash password using bcrypt
 * 3. Create user in database (the unique indexes reject taken names/emails)
 * 4. Return the new user
 *
 * # Validation
 *
 * - Username: 3-30 characters, letters, digits or underscores
 * - Email must contain '@'
 * - Password must be at least 6 characters long
 */

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse, UserView};
use crate::backend::auth::users::{create_user, NewUser};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::UserRole;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate username format
pub(crate) fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return false;
    }
    username.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, invalid username/email, short password, unknown role
/// * `409 Conflict` - username or email already exists
/// * `500 Internal Server Error` - hashing or store failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "alice", "email": "alice@example.com", "password": "secret1", "role": "tourist"}
/// ```
pub async fn register(
    State(db): State<Database>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<Json<RegisterResponse>> {
    let username = require(request.username, "username")?.trim().to_string();
    let email = require(request.email, "email")?.trim().to_string();
    let password = require(request.password, "password")?;
    let role = match request.role.as_deref() {
        Some(role) if !role.trim().is_empty() => UserRole::parse(role)?,
        _ => UserRole::Tourist,
    };

    tracing::info!("Register request for username: {}, email: {}", username, email);

    if !is_valid_username(&username) {
        tracing::warn!("Invalid username format: {}", username);
        return Err(BackendError::validation(
            "username",
            "Username must be 3-30 characters of letters, digits or underscores",
        ));
    }
    if !email.contains('@') {
        tracing::warn!("Invalid email format: {}", email);
        return Err(BackendError::validation("email", "Invalid email format"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        tracing::warn!("Password too short");
        return Err(BackendError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    let password_hash = hash(&password, DEFAULT_COST)?;

    let user = create_user(
        db.pool(),
        NewUser {
            username,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!("User created successfully: {} ({})", user.username, user.id);

    Ok(Json(RegisterResponse {
        success: true,
        message: "Registration successful".to_string(),
        user: UserView::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("alice_01"));
        assert!(is_valid_username("导游小王"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }
}
