//! Chat session queries
//!
//! Private chats are keyed by `pair_key` (unique), so the get-or-create is an
//! `INSERT OR IGNORE` followed by a lookup and concurrent callers converge on
//! the same row. A new chat's `last_msg_time` starts at its creation time so
//! it lists above older conversations.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::backend::auth::users::{require_user, ProfileRow};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{begin_write, now_timestamp};
use crate::shared::messaging::{pair_key, ChatSummary, ChatType};
use crate::shared::PublicProfile;

/// Stored chat row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatRow {
    pub id: i64,
    #[sqlx(rename = "type")]
    pub chat_type: String,
    pub pair_key: Option<String>,
    pub last_msg: Option<String>,
    pub last_msg_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ChatListRow {
    id: i64,
    #[sqlx(rename = "type")]
    chat_type: String,
    last_msg: Option<String>,
    last_msg_time: Option<String>,
    created_at: String,
    updated_at: String,
    unread_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ParticipantRow {
    chat_id: i64,
    #[sqlx(flatten)]
    profile: ProfileRow,
}

/// Get a chat by id
pub async fn get_chat(conn: &mut SqliteConnection, chat_id: i64) -> BackendResult<Option<ChatRow>> {
    let chat = sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, type, pair_key, last_msg, last_msg_time, created_at, updated_at
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(chat)
}

/// Add participants to a chat, skipping those already in it
pub(crate) async fn add_participants(
    conn: &mut SqliteConnection,
    chat_id: i64,
    user_ids: &[i64],
) -> BackendResult<()> {
    let now = now_timestamp();
    for user_id in user_ids {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO chat_participants (chat_id, user_id, joined_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Get-or-create the private chat of two users inside the caller's transaction
///
/// # Returns
///
/// `(chat_id, is_new)`; `is_new` is true only for the call that inserted the row
pub(crate) async fn get_or_create_private_chat_in(
    conn: &mut SqliteConnection,
    user1: i64,
    user2: i64,
) -> BackendResult<(i64, bool)> {
    let key = pair_key(user1, user2);
    let now = now_timestamp();

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO chats (type, pair_key, last_msg_time, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(ChatType::Private.as_str())
    .bind(&key)
    .bind(&now)
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?
    .rows_affected()
        == 1;

    let (chat_id,): (i64,) = sqlx::query_as("SELECT id FROM chats WHERE pair_key = ?")
        .bind(&key)
        .fetch_one(&mut *conn)
        .await?;

    // Existing chats get their participant rows repaired as well
    add_participants(conn, chat_id, &[user1, user2]).await?;

    if inserted {
        tracing::info!("Created private chat {} for users {} and {}", chat_id, user1, user2);
    }
    Ok((chat_id, inserted))
}

/// Get or create the private chat between two users
///
/// # Errors
/// * `Validation` - both ids are the same user
/// * `NotFound` - either user does not exist
pub async fn get_or_create_private_chat(
    pool: &SqlitePool,
    user1: i64,
    user2: i64,
) -> BackendResult<(i64, bool)> {
    if user1 == user2 {
        return Err(BackendError::validation(
            "userId2",
            "Cannot create a private chat with yourself",
        ));
    }

    let mut tx = begin_write(pool).await?;
    require_user(&mut *tx, user1).await?;
    require_user(&mut *tx, user2).await?;
    let result = get_or_create_private_chat_in(&mut *tx, user1, user2).await?;
    tx.commit().await?;

    Ok(result)
}

/// Check if user is a participant of a chat
pub async fn is_participant(pool: &SqlitePool, chat_id: i64, user_id: i64) -> BackendResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM chat_participants WHERE chat_id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

/// List every chat the user participates in, most recent activity first
///
/// Each chat carries the other participants' profiles and the number of
/// `sent`, non-deleted messages addressed to the user.
pub async fn list_chats_for_user(pool: &SqlitePool, user_id: i64) -> BackendResult<Vec<ChatSummary>> {
    let chats = sqlx::query_as::<_, ChatListRow>(
        r#"
        SELECT c.id, c.type, c.last_msg, c.last_msg_time, c.created_at, c.updated_at,
               (SELECT COUNT(*) FROM messages m
                 WHERE m.chat_id = c.id
                   AND m.to_id = ?
                   AND m.status = 'sent'
                   AND m.is_deleted = 0) AS unread_count
        FROM chats c
        JOIN chat_participants cp ON cp.chat_id = c.id
        WHERE cp.user_id = ?
        ORDER BY COALESCE(c.last_msg_time, c.created_at) DESC, c.updated_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let participants = sqlx::query_as::<_, ParticipantRow>(
        r#"
        SELECT cp.chat_id, u.id, u.username, u.avatar, u.role, u.created_at
        FROM chat_participants cp
        JOIN users u ON u.id = cp.user_id
        WHERE cp.chat_id IN (SELECT chat_id FROM chat_participants WHERE user_id = ?)
          AND cp.user_id != ?
        ORDER BY cp.id
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut others: HashMap<i64, Vec<PublicProfile>> = HashMap::new();
    for row in participants {
        others
            .entry(row.chat_id)
            .or_default()
            .push(PublicProfile::from(row.profile));
    }

    let summaries = chats
        .into_iter()
        .map(|chat| ChatSummary {
            id: chat.id,
            chat_type: ChatType::parse(&chat.chat_type).unwrap_or_default(),
            participants: others.remove(&chat.id).unwrap_or_default(),
            last_msg: chat.last_msg,
            last_msg_time: chat.last_msg_time,
            unread_count: chat.unread_count,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        })
        .collect();

    Ok(summaries)
}
