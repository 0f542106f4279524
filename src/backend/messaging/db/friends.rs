//! Friend request and friend edge queries
//!
//! A friendship is stored as two directed rows in `friends`. Both rows are
//! written (or removed) in one statement or transaction so that
//! `are_friends(a, b) == are_friends(b, a)` holds between calls.

use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::backend::auth::users::{require_user, ProfileRow};
use crate::backend::error::{BackendError, BackendResult, ConflictKind};
use crate::backend::messaging::db::chats::get_or_create_private_chat_in;
use crate::backend::store::{begin_write, now_timestamp};
use crate::shared::error::SharedError;
use crate::shared::messaging::{Friend, FriendRequest, FriendRequestStatus, IncomingFriendRequest};
use crate::shared::PublicProfile;

const REQUEST_COLUMNS: &str = "id, from_id, to_id, status, message, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct FriendRequestRow {
    id: i64,
    from_id: i64,
    to_id: i64,
    status: String,
    message: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FriendRequestRow> for FriendRequest {
    type Error = SharedError;

    fn try_from(row: FriendRequestRow) -> Result<Self, Self::Error> {
        Ok(FriendRequest {
            id: row.id,
            from_id: row.from_id,
            to_id: row.to_id,
            status: FriendRequestStatus::parse(&row.status)?,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A pending request joined with its sender's profile
#[derive(Debug, sqlx::FromRow)]
struct IncomingRow {
    #[sqlx(flatten)]
    sender: ProfileRow,
    request_id: i64,
    to_id: i64,
    status: String,
    message: Option<String>,
    requested_at: String,
    request_updated_at: String,
}

impl TryFrom<IncomingRow> for IncomingFriendRequest {
    type Error = SharedError;

    fn try_from(row: IncomingRow) -> Result<Self, Self::Error> {
        let request = FriendRequest {
            id: row.request_id,
            from_id: row.sender.id,
            to_id: row.to_id,
            status: FriendRequestStatus::parse(&row.status)?,
            message: row.message,
            created_at: row.requested_at,
            updated_at: row.request_updated_at,
        };
        Ok(IncomingFriendRequest {
            request,
            from_user: PublicProfile::from(row.sender),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FriendRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    friend_since: String,
}

/// Result of accepting a friend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOutcome {
    pub request: FriendRequest,
    /// Private chat of the two users
    pub chat_id: i64,
    /// Whether this acceptance created the chat
    pub is_new: bool,
}

/// Get a friend request by ID
pub async fn get_friend_request<'e, E>(executor: E, request_id: i64) -> BackendResult<Option<FriendRequest>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, FriendRequestRow>(&format!(
        "SELECT {} FROM friend_requests WHERE id = ?",
        REQUEST_COLUMNS
    ))
    .bind(request_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(FriendRequest::try_from).transpose()?)
}

/// Check whether `user_id` has `friend_id` as a friend
pub async fn are_friends<'e, E>(executor: E, user_id: i64, friend_id: i64) -> BackendResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM friends WHERE user_id = ? AND friend_id = ?")
            .bind(user_id)
            .bind(friend_id)
            .fetch_optional(executor)
            .await?;

    Ok(row.is_some())
}

/// Write both directions of a friendship, skipping rows that already exist
///
/// Returns the number of rows actually inserted (0, 1 or 2).
async fn insert_friend_pair(conn: &mut SqliteConnection, user_a: i64, user_b: i64) -> BackendResult<u64> {
    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO friends (user_id, friend_id, created_at)
        VALUES (?, ?, ?), (?, ?, ?)
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .bind(now_timestamp())
    .bind(user_b)
    .bind(user_a)
    .bind(now_timestamp())
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(inserted)
}

/// Send a friend request
///
/// # Errors
/// * `Validation` - a user sending a request to themselves
/// * `NotFound` - either user does not exist
/// * `Conflict(AlreadyFriends)` - the users are already friends
/// * `Conflict(DuplicateRequest)` - a pending request from `from_id` to `to_id` exists
pub async fn send_friend_request(
    pool: &SqlitePool,
    from_id: i64,
    to_id: i64,
    message: Option<&str>,
) -> BackendResult<FriendRequest> {
    if from_id == to_id {
        return Err(BackendError::validation(
            "toId",
            "Cannot send a friend request to yourself",
        ));
    }

    require_user(pool, from_id).await?;
    require_user(pool, to_id).await?;

    if are_friends(pool, from_id, to_id).await? {
        return Err(BackendError::conflict(ConflictKind::AlreadyFriends));
    }

    let now = now_timestamp();
    // The partial unique index on pending (from_id, to_id) turns a duplicate
    // into an ignored insert, which returns no row.
    let row = sqlx::query_as::<_, FriendRequestRow>(&format!(
        r#"
        INSERT OR IGNORE INTO friend_requests (from_id, to_id, status, message, created_at, updated_at)
        VALUES (?, ?, 'pending', ?, ?, ?)
        RETURNING {}
        "#,
        REQUEST_COLUMNS
    ))
    .bind(from_id)
    .bind(to_id)
    .bind(message)
    .bind(&now)
    .bind(&now)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or_else(|| BackendError::conflict(ConflictKind::DuplicateRequest))?;
    let request = FriendRequest::try_from(row)?;

    tracing::info!("Friend request {} sent from {} to {}", request.id, from_id, to_id);
    Ok(request)
}

/// Pending requests addressed to a user, oldest first, with the sender's profile
pub async fn list_incoming_requests(
    pool: &SqlitePool,
    user_id: i64,
) -> BackendResult<Vec<IncomingFriendRequest>> {
    let rows = sqlx::query_as::<_, IncomingRow>(
        r#"
        SELECT u.id, u.username, u.avatar, u.role, u.created_at,
               fr.id AS request_id, fr.to_id, fr.status, fr.message,
               fr.created_at AS requested_at,
               fr.updated_at AS request_updated_at
        FROM friend_requests fr
        JOIN users u ON u.id = fr.from_id
        WHERE fr.to_id = ? AND fr.status = 'pending'
        ORDER BY fr.created_at, fr.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let requests = rows
        .into_iter()
        .map(IncomingFriendRequest::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(requests)
}

/// Accept a friend request
///
/// In one transaction: ensures the private chat of the two users exists,
/// marks the request accepted and writes both friend edges. Accepting an
/// already accepted request is idempotent and returns the same chat.
///
/// # Errors
/// * `NotFound` - no such request
/// * `Conflict(RequestResolved)` - the request was rejected
pub async fn accept_friend_request(pool: &SqlitePool, request_id: i64) -> BackendResult<AcceptOutcome> {
    let mut tx = begin_write(pool).await?;

    let request = get_friend_request(&mut *tx, request_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Friend request"))?;

    if request.status == FriendRequestStatus::Rejected {
        return Err(BackendError::conflict(ConflictKind::RequestResolved));
    }

    let (chat_id, is_new) =
        get_or_create_private_chat_in(&mut *tx, request.from_id, request.to_id).await?;

    let request = if request.is_pending() {
        let now = now_timestamp();
        sqlx::query("UPDATE friend_requests SET status = 'accepted', updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(request_id)
            .execute(&mut *tx)
            .await?;
        FriendRequest {
            status: FriendRequestStatus::Accepted,
            updated_at: now,
            ..request
        }
    } else {
        request
    };

    insert_friend_pair(&mut *tx, request.from_id, request.to_id).await?;
    tx.commit().await?;

    tracing::info!(
        "Friend request {} accepted, users {} and {} share chat {}",
        request_id,
        request.from_id,
        request.to_id,
        chat_id
    );

    Ok(AcceptOutcome {
        request,
        chat_id,
        is_new,
    })
}

/// Reject a friend request
///
/// Rejecting an already rejected request is a no-op.
///
/// # Errors
/// * `NotFound` - no such request
/// * `Conflict(RequestResolved)` - the request was already accepted
pub async fn reject_friend_request(pool: &SqlitePool, request_id: i64) -> BackendResult<FriendRequest> {
    let request = get_friend_request(pool, request_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Friend request"))?;

    match request.status {
        FriendRequestStatus::Accepted => Err(BackendError::conflict(ConflictKind::RequestResolved)),
        FriendRequestStatus::Rejected => Ok(request),
        FriendRequestStatus::Pending => {
            let now = now_timestamp();
            // Guarded on status so a concurrent accept wins cleanly
            let updated = sqlx::query(
                "UPDATE friend_requests SET status = 'rejected', updated_at = ? WHERE id = ? AND status = 'pending'",
            )
            .bind(&now)
            .bind(request_id)
            .execute(pool)
            .await?
            .rows_affected();

            if updated == 0 {
                return Err(BackendError::conflict(ConflictKind::RequestResolved));
            }

            tracing::info!("Friend request {} rejected", request_id);
            Ok(FriendRequest {
                status: FriendRequestStatus::Rejected,
                updated_at: now,
                ..request
            })
        }
    }
}

/// Make two users friends without a request
///
/// Returns `false` when the friendship already existed in both directions.
pub async fn add_friend(pool: &SqlitePool, user_id: i64, friend_id: i64) -> BackendResult<bool> {
    if user_id == friend_id {
        return Err(BackendError::validation("friendId", "Cannot add yourself as a friend"));
    }

    let mut tx = begin_write(pool).await?;
    require_user(&mut *tx, user_id).await?;
    require_user(&mut *tx, friend_id).await?;
    let inserted = insert_friend_pair(&mut *tx, user_id, friend_id).await?;
    tx.commit().await?;

    Ok(inserted > 0)
}

/// A user's friends, most recent first
pub async fn list_friends(pool: &SqlitePool, user_id: i64) -> BackendResult<Vec<Friend>> {
    let rows = sqlx::query_as::<_, FriendRow>(
        r#"
        SELECT u.id, u.username, u.avatar, u.role, u.created_at, f.created_at AS friend_since
        FROM friends f
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = ?
        ORDER BY f.created_at DESC, f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Friend {
            profile: PublicProfile::from(row.profile),
            friend_since: row.friend_since,
        })
        .collect())
}

/// Remove a friendship in both directions
///
/// # Errors
/// * `NotFound` - the users were not friends
pub async fn remove_friend(pool: &SqlitePool, user_id: i64, friend_id: i64) -> BackendResult<u64> {
    let removed = sqlx::query(
        r#"
        DELETE FROM friends
        WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .bind(friend_id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if removed == 0 {
        return Err(BackendError::not_found("Friend"));
    }

    tracing::info!("Users {} and {} are no longer friends", user_id, friend_id);
    Ok(removed)
}
