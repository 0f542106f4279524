/**
 * Password Reset Requests
 *
 * There is no mail transport: a user who forgot their password files a
 * request by email address, and a guide resolves it by assigning a new
 * username and password or by rejecting it. Requests expire after a day and
 * a new request for the same email replaces the old one.
 */

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::auth::users::{update_credentials, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{begin_write, hours_from_now_timestamp, now_timestamp};

/// Lifetime of a reset request
pub const RESET_REQUEST_TTL_HOURS: i64 = 24;

const RESET_COLUMNS: &str = "id, user_id, email, created_at, expires_at";

/// A pending password reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub created_at: String,
    pub expires_at: String,
}

/// File a reset request for the account registered under `email`
///
/// # Errors
/// * `NotFound` - no account uses this email
pub async fn create_reset_request(pool: &SqlitePool, email: &str) -> BackendResult<ResetRequest> {
    let mut tx = begin_write(pool).await?;

    let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;
    let (user_id,) = user.ok_or_else(|| BackendError::not_found("User"))?;

    sqlx::query("DELETE FROM password_reset_requests WHERE email = ?")
        .bind(email)
        .execute(&mut *tx)
        .await?;

    let request = sqlx::query_as::<_, ResetRequest>(&format!(
        r#"
        INSERT INTO password_reset_requests (user_id, email, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        RETURNING {}
        "#,
        RESET_COLUMNS
    ))
    .bind(user_id)
    .bind(email)
    .bind(now_timestamp())
    .bind(hours_from_now_timestamp(RESET_REQUEST_TTL_HOURS))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!("Password reset requested for user {} (request {})", user_id, request.id);
    Ok(request)
}

/// Requests that have not expired, oldest first
pub async fn list_reset_requests(pool: &SqlitePool) -> BackendResult<Vec<ResetRequest>> {
    let requests = sqlx::query_as::<_, ResetRequest>(&format!(
        "SELECT {} FROM password_reset_requests WHERE expires_at > ? ORDER BY created_at, id",
        RESET_COLUMNS
    ))
    .bind(now_timestamp())
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Give the requesting user new credentials and close the request
///
/// # Errors
/// * `NotFound` - no live request with this id
/// * `Conflict(UsernameTaken)` - the new username belongs to someone else
pub async fn approve_reset(
    pool: &SqlitePool,
    request_id: i64,
    username: &str,
    password_hash: &str,
) -> BackendResult<User> {
    let mut tx = begin_write(pool).await?;

    let request = sqlx::query_as::<_, ResetRequest>(&format!(
        "SELECT {} FROM password_reset_requests WHERE id = ? AND expires_at > ?",
        RESET_COLUMNS
    ))
    .bind(request_id)
    .bind(now_timestamp())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| BackendError::not_found("Reset request"))?;

    let user = update_credentials(&mut *tx, request.user_id, username, password_hash).await?;

    sqlx::query("DELETE FROM password_reset_requests WHERE id = ?")
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("Password reset {} approved for user {}", request_id, user.id);
    Ok(user)
}

/// Drop a live request without touching the account
///
/// # Errors
/// * `NotFound` - no live request with this id
pub async fn reject_reset(pool: &SqlitePool, request_id: i64) -> BackendResult<()> {
    let result = sqlx::query("DELETE FROM password_reset_requests WHERE id = ? AND expires_at > ?")
        .bind(request_id)
        .bind(now_timestamp())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(BackendError::not_found("Reset request"));
    }
    tracing::info!("Password reset {} rejected", request_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::{create_user, get_user_by_id, NewUser};
    use crate::backend::error::ConflictKind;
    use crate::backend::store::{days_ago_timestamp, Database};
    use crate::shared::UserRole;
    use assert_matches::assert_matches;

    async fn user(db: &Database, name: &str) -> User {
        create_user(
            db.pool(),
            NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "old-hash".to_string(),
                role: UserRole::Tourist,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_request_replaces_old_one() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = user(&db, "alice").await;

        let first = create_reset_request(db.pool(), &alice.email).await.unwrap();
        let second = create_reset_request(db.pool(), &alice.email).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.user_id, alice.id);
        assert!(second.expires_at > second.created_at);

        let live = list_reset_requests(db.pool()).await.unwrap();
        assert_eq!(live, vec![second]);

        let unknown = create_reset_request(db.pool(), "nobody@example.com").await;
        assert_matches!(unknown, Err(BackendError::NotFound { entity: "User" }));
    }

    #[tokio::test]
    async fn test_approve_sets_credentials_and_closes() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = user(&db, "alice").await;
        user(&db, "bob").await;
        let request = create_reset_request(db.pool(), &alice.email).await.unwrap();

        let taken = approve_reset(db.pool(), request.id, "bob", "new-hash").await;
        assert_matches!(
            taken,
            Err(BackendError::Conflict { kind: ConflictKind::UsernameTaken, .. })
        );
        assert_eq!(list_reset_requests(db.pool()).await.unwrap().len(), 1);

        let updated = approve_reset(db.pool(), request.id, "alice_new", "new-hash").await.unwrap();
        assert_eq!(updated.username, "alice_new");
        let stored = get_user_by_id(db.pool(), alice.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert!(list_reset_requests(db.pool()).await.unwrap().is_empty());

        let again = approve_reset(db.pool(), request.id, "alice_new2", "hash").await;
        assert_matches!(again, Err(BackendError::NotFound { entity: "Reset request" }));
    }

    #[tokio::test]
    async fn test_expired_requests_are_invisible() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = user(&db, "alice").await;
        let request = create_reset_request(db.pool(), &alice.email).await.unwrap();

        sqlx::query("UPDATE password_reset_requests SET expires_at = ? WHERE id = ?")
            .bind(days_ago_timestamp(1))
            .bind(request.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(list_reset_requests(db.pool()).await.unwrap().is_empty());
        assert_matches!(
            reject_reset(db.pool(), request.id).await,
            Err(BackendError::NotFound { entity: "Reset request" })
        );
        assert_matches!(
            approve_reset(db.pool(), request.id, "alice_new", "hash").await,
            Err(BackendError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_reject_keeps_account() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = user(&db, "alice").await;
        let request = create_reset_request(db.pool(), &alice.email).await.unwrap();

        reject_reset(db.pool(), request.id).await.unwrap();
        assert!(list_reset_requests(db.pool()).await.unwrap().is_empty());
        let stored = get_user_by_id(db.pool(), alice.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "alice");
        assert_eq!(stored.password_hash, "old-hash");
    }
}
