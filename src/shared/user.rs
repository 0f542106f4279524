//! User Data Structures
//!
//! Roles and the public profile that other users get to see. The full user
//! record with its password hash never leaves the backend.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Travelling user, the default on registration
    #[default]
    Tourist,
    /// Local guide that tourists can bind to
    Guide,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Tourist => "tourist",
            UserRole::Guide => "guide",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s.trim().to_lowercase().as_str() {
            "tourist" => Ok(UserRole::Tourist),
            "guide" => Ok(UserRole::Guide),
            _ => Err(SharedError::unknown("role", s)),
        }
    }
}

/// Profile fields visible to other users
///
/// Returned as the "other participant" of a chat, the sender of a friend
/// request and in user search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: String,
}

/// Account statistics for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub tourists: i64,
    pub guides: i64,
    /// Registrations in the last 7 days
    pub recent_registrations: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("guide").unwrap(), UserRole::Guide);
        assert_eq!(UserRole::parse(" Tourist ").unwrap(), UserRole::Tourist);
        assert!(UserRole::parse("admin").is_err());
    }

    #[test]
    fn test_profile_wire_format() {
        let profile = PublicProfile {
            id: 2,
            username: "guide1".to_string(),
            avatar: None,
            role: UserRole::Guide,
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "guide");
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00.000000Z");
    }
}
