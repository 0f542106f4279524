/**
 * Password Reset Handlers
 *
 * - `POST /api/auth/forgot-password` - public, files a request by email
 * - `GET /api/auth/reset-requests` - guides list live requests
 * - `POST /api/auth/process-reset` - guides approve or reject a request
 *
 * The two guide routes are mounted behind `auth_middleware`; the caller's
 * role comes from the verified token.
 */

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::register::{is_valid_username, MIN_PASSWORD_LEN};
use crate::backend::auth::handlers::types::{
    ForgotPasswordRequest, ForgotPasswordResponse, ProcessResetRequest, ResetRequestsResponse,
};
use crate::backend::auth::resets::{
    approve_reset, create_reset_request, list_reset_requests, reject_reset,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::store::Database;
use crate::shared::error::{require, SharedError};
use crate::shared::{ActionResponse, UserRole};

fn require_guide(auth: &AuthenticatedUser) -> BackendResult<()> {
    if auth.role == UserRole::Guide.as_str() {
        Ok(())
    } else {
        tracing::warn!("User {} is not a guide", auth.user_id);
        Err(BackendError::permission_denied("Only guides can handle password resets"))
    }
}

/// File a password reset request
///
/// # Errors
///
/// * `400 Bad Request` - missing email
/// * `404 Not Found` - no account uses this email
pub async fn forgot_password(
    State(db): State<Database>,
    Json(request): Json<ForgotPasswordRequest>,
) -> BackendResult<Json<ForgotPasswordResponse>> {
    let email = require(request.email, "email")?.trim().to_string();
    let reset = create_reset_request(db.pool(), &email).await?;

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "Reset request sent, a guide will handle it".to_string(),
        request_id: reset.id,
    }))
}

/// List live reset requests
///
/// # Errors
///
/// * `403 Forbidden` - the caller is not a guide
pub async fn reset_requests(
    State(db): State<Database>,
    AuthUser(auth): AuthUser,
) -> BackendResult<Json<ResetRequestsResponse>> {
    require_guide(&auth)?;
    let requests = list_reset_requests(db.pool()).await?;

    Ok(Json(ResetRequestsResponse {
        success: true,
        requests,
    }))
}

/// Approve or reject a reset request
///
/// Approving assigns the new username and password under the registration
/// rules.
///
/// # Errors
///
/// * `400 Bad Request` - unknown action, missing or invalid credentials
/// * `403 Forbidden` - the caller is not a guide
/// * `404 Not Found` - no live request with this id
/// * `409 Conflict` - the new username is taken
pub async fn process_reset(
    State(db): State<Database>,
    AuthUser(auth): AuthUser,
    Json(request): Json<ProcessResetRequest>,
) -> BackendResult<Json<ActionResponse>> {
    require_guide(&auth)?;
    let request_id = require(request.request_id, "requestId")?;

    match require(request.action.as_deref(), "action")? {
        "approve" => {
            let username = require(request.new_username, "newUsername")?.trim().to_string();
            let password = require(request.new_password, "newPassword")?;
            if !is_valid_username(&username) {
                return Err(BackendError::validation(
                    "newUsername",
                    "Username must be 3-30 characters of letters, digits or underscores",
                ));
            }
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(BackendError::validation(
                    "newPassword",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
                ));
            }

            let password_hash = hash(&password, DEFAULT_COST)?;
            approve_reset(db.pool(), request_id, &username, &password_hash).await?;
            tracing::info!("Guide {} approved reset {}", auth.user_id, request_id);
            Ok(Json(ActionResponse::ok("Credentials reset")))
        }
        "reject" => {
            reject_reset(db.pool(), request_id).await?;
            Ok(Json(ActionResponse::ok("Reset request rejected")))
        }
        other => Err(SharedError::unknown("reset action", other).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            username: "someone".to_string(),
            role: role.as_str().to_string(),
        }
    }

    #[test]
    fn test_only_guides_handle_resets() {
        assert!(require_guide(&caller(UserRole::Guide)).is_ok());
        assert!(matches!(
            require_guide(&caller(UserRole::Tourist)),
            Err(BackendError::PermissionDenied { .. })
        ));
    }
}
