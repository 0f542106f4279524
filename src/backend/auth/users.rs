/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations.
 */

use sqlx::{Sqlite, SqlitePool};

use crate::backend::error::{BackendError, BackendResult, ConflictKind};
use crate::backend::store::{days_ago_timestamp, now_timestamp};
use crate::shared::{PublicProfile, UserRole, UserStats};

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, role, \
     has_completed_survey, is_active, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub avatar: Option<String>,
    /// "tourist" or "guide", guarded by a CHECK constraint
    pub role: String,
    pub has_completed_survey: bool,
    /// Disabled accounts cannot log in
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or_default()
    }

    /// Fields visible to other users
    pub fn profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            role: self.role(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Fields of a user about to be created
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Row shape of a public profile query
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<ProfileRow> for PublicProfile {
    fn from(row: ProfileRow) -> Self {
        PublicProfile {
            id: row.id,
            username: row.username,
            avatar: row.avatar,
            role: UserRole::parse(&row.role).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// Map a unique violation on `users` to the matching conflict
fn map_user_conflict(err: sqlx::Error) -> BackendError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return BackendError::conflict(ConflictKind::UsernameTaken);
            }
            if message.contains("users.email") {
                return BackendError::conflict(ConflictKind::EmailTaken);
            }
        }
    }
    BackendError::Store(err)
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `new_user` - Username, email, password hash and role
///
/// # Returns
/// Created user, or `Conflict` when the username or email is taken
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> BackendResult<User> {
    let now = now_timestamp();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, password_hash, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.role.as_str())
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await
    .map_err(map_user_conflict)?;

    Ok(user)
}

/// Get user by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> BackendResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> BackendResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> BackendResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get a user's public profile
///
/// Works on the pool or inside a caller's transaction.
pub async fn find_profile<'e, E>(executor: E, id: i64) -> BackendResult<Option<PublicProfile>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, avatar, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(PublicProfile::from))
}

/// Fail with `NotFound("User")` unless the user exists
pub async fn require_user<'e, E>(executor: E, id: i64) -> BackendResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    exists.map(|_| ()).ok_or_else(|| BackendError::not_found("User"))
}

/// All users, newest first
pub async fn list_users(pool: &SqlitePool) -> BackendResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Account counters for the dashboard
pub async fn user_stats(pool: &SqlitePool) -> BackendResult<UserStats> {
    let since = days_ago_timestamp(7);
    let (total, active, tourists, guides, recent): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN is_active = 1 THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN role = 'tourist' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN role = 'guide' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0)
        FROM users
        "#,
    )
    .bind(&since)
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        total,
        active,
        inactive: total - active,
        tourists,
        guides,
        recent_registrations: recent,
    })
}

/// Find users whose username contains `keyword`, optionally of one role
pub async fn search_users(
    pool: &SqlitePool,
    keyword: &str,
    role: Option<UserRole>,
) -> BackendResult<Vec<PublicProfile>> {
    let pattern = format!("%{}%", keyword);
    let rows = match role {
        Some(role) => {
            sqlx::query_as::<_, ProfileRow>(
                r#"
                SELECT id, username, avatar, role, created_at FROM users
                WHERE username LIKE ? AND role = ?
                ORDER BY id
                "#,
            )
            .bind(&pattern)
            .bind(role.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProfileRow>(
                r#"
                SELECT id, username, avatar, role, created_at FROM users
                WHERE username LIKE ?
                ORDER BY id
                "#,
            )
            .bind(&pattern)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(PublicProfile::from).collect())
}

/// Change a user's username and/or avatar
///
/// # Errors
/// * `Validation` - neither field given
/// * `NotFound` - no such user
/// * `Conflict(UsernameTaken)` - the new username belongs to someone else
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    avatar: Option<&str>,
) -> BackendResult<User> {
    if username.is_none() && avatar.is_none() {
        return Err(BackendError::validation("username", "No fields to update"));
    }
    let username = username.map(str::trim);
    if username.is_some_and(str::is_empty) {
        return Err(BackendError::validation("username", "Username cannot be empty"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE(?, username),
            avatar = COALESCE(?, avatar),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(username)
    .bind(avatar)
    .bind(now_timestamp())
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(map_user_conflict)?;

    user.ok_or_else(|| BackendError::not_found("User"))
}

/// Replace a user's username and password hash
///
/// Used when a guide resolves a password reset; runs inside the caller's
/// transaction.
///
/// # Errors
/// * `NotFound` - no such user
/// * `Conflict(UsernameTaken)` - the username belongs to someone else
pub async fn update_credentials<'e, E>(
    executor: E,
    user_id: i64,
    username: &str,
    password_hash: &str,
) -> BackendResult<User>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET username = ?, password_hash = ?, updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(username)
    .bind(password_hash)
    .bind(now_timestamp())
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(map_user_conflict)?;

    user.ok_or_else(|| BackendError::not_found("User"))
}
