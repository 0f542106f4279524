/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the account
 * handlers (register, login, user directory).
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::resets::ResetRequest;
use crate::backend::auth::users::User;
use crate::shared::ids::optional_id;
use crate::shared::{PublicProfile, UserRole, UserStats};

/// Registration request
///
/// All fields are optional on the wire so that a missing field is reported
/// as a validation error rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// "tourist" (default) or "guide"
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
///
/// `username` may also be an email address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User information returned to the account owner
///
/// The id is rendered as a string, which clients send back as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub has_completed_survey: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            role: user.role(),
            has_completed_survey: user.has_completed_survey,
            is_active: user.is_active,
            created_at: user.created_at.clone(),
        }
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
}

/// Login response with the issued JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub success: bool,
    pub users: Vec<UserView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub success: bool,
    pub stats: UserStats,
}

/// Query string of `/users/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchUsersParams {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub success: bool,
    pub users: Vec<PublicProfile>,
}

/// Body of `/user/update_profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Body of `/auth/forgot-password`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub request_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequestsResponse {
    pub success: bool,
    pub requests: Vec<ResetRequest>,
}

/// Body of `/auth/process-reset`
///
/// `newUsername` and `newPassword` are only read when approving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResetRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub request_id: Option<i64>,
    #[serde(default)]
    pub new_username: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    /// "approve" or "reject"
    #[serde(default)]
    pub action: Option<String>,
}
