/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * The HMAC secret comes from `ServerConfig::jwt_secret`.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;

/// Token lifetime: 7 days
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    /// "tourist" or "guide"
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// User ID carried in `sub`
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - HMAC secret
/// * `user` - The authenticated user
///
/// # Returns
/// JWT token string
pub fn create_token(secret: &str, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.clone(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `secret` - HMAC secret the token was signed with
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error (bad signature, expired, malformed)
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn user() -> User {
        User {
            id: 42,
            username: "guide1".to_string(),
            email: "guide1@example.com".to_string(),
            password_hash: String::new(),
            avatar: None,
            role: "guide".to_string(),
            has_completed_survey: false,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let token = create_token(SECRET, &user()).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.username, "guide1");
        assert_eq!(claims.role, "guide");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = create_token(SECRET, &user()).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }
}
