//! Message queries
//!
//! Messages are never physically deleted. `is_deleted` hides them from
//! listings and unread counts while `get_message` still returns them.
//! Read state only ever moves `sent -> read`.

use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::backend::auth::users::require_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db::chats::get_chat;
use crate::backend::store::{begin_write, now_timestamp};
use crate::shared::error::SharedError;
use crate::shared::messaging::{
    preview_text, Message, MessageParty, MessagePayload, MessageStatus, MessageType, MessageView,
};

/// Messages returned by a listing when no limit is given
pub const DEFAULT_PAGE_SIZE: i64 = 30;
/// Upper bound on a listing's limit
pub const MAX_PAGE_SIZE: i64 = 200;

const MESSAGE_COLUMNS: &str = "id, chat_id, from_id, to_id, content, type, image_url, voice_url, \
     file_url, timestamp, status, is_deleted";

const VIEW_SELECT: &str = r#"
    SELECT m.id, m.chat_id, m.from_id, m.to_id, m.content, m.type, m.image_url, m.voice_url,
           m.file_url, m.timestamp, m.status, m.is_deleted,
           fu.username AS from_username, fu.avatar AS from_avatar,
           tu.username AS to_username, tu.avatar AS to_avatar
    FROM messages m
    JOIN users fu ON fu.id = m.from_id
    JOIN users tu ON tu.id = m.to_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chat_id: i64,
    from_id: i64,
    to_id: i64,
    content: Option<String>,
    #[sqlx(rename = "type")]
    message_type: String,
    image_url: Option<String>,
    voice_url: Option<String>,
    file_url: Option<String>,
    timestamp: String,
    status: String,
    is_deleted: bool,
}

impl TryFrom<MessageRow> for Message {
    type Error = SharedError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            chat_id: row.chat_id,
            from_id: row.from_id,
            to_id: row.to_id,
            content: row.content,
            message_type: MessageType::parse(&row.message_type)?,
            image_url: row.image_url,
            voice_url: row.voice_url,
            file_url: row.file_url,
            timestamp: row.timestamp,
            status: MessageStatus::parse(&row.status)?,
            is_deleted: row.is_deleted,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageViewRow {
    #[sqlx(flatten)]
    message: MessageRow,
    from_username: String,
    from_avatar: Option<String>,
    to_username: String,
    to_avatar: Option<String>,
}

impl TryFrom<MessageViewRow> for MessageView {
    type Error = SharedError;

    fn try_from(row: MessageViewRow) -> Result<Self, Self::Error> {
        let message = Message::try_from(row.message)?;
        Ok(MessageView {
            from: MessageParty {
                id: message.from_id,
                username: row.from_username,
                avatar: row.from_avatar,
            },
            to: MessageParty {
                id: message.to_id,
                username: row.to_username,
                avatar: row.to_avatar,
            },
            message,
        })
    }
}

/// A message about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub message_type: MessageType,
    pub payload: MessagePayload,
}

async fn fetch_view(conn: &mut SqliteConnection, message_id: i64) -> BackendResult<Option<MessageView>> {
    let row = sqlx::query_as::<_, MessageViewRow>(&format!("{} WHERE m.id = ?", VIEW_SELECT))
        .bind(message_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(MessageView::try_from).transpose()?)
}

/// Store a message and update its chat's preview
///
/// Insert and preview update run in one write transaction, so a chat's
/// preview always belongs to a stored message.
///
/// # Errors
/// * `NotFound` - the chat, sender or recipient does not exist
pub async fn send_message(pool: &SqlitePool, new_message: NewMessage) -> BackendResult<MessageView> {
    let NewMessage {
        chat_id,
        from_id,
        to_id,
        message_type,
        payload,
    } = new_message;

    let mut tx = begin_write(pool).await?;

    get_chat(&mut *tx, chat_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat"))?;
    require_user(&mut *tx, from_id).await?;
    require_user(&mut *tx, to_id).await?;

    let now = now_timestamp();
    let (message_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO messages
            (chat_id, from_id, to_id, content, type, image_url, voice_url, file_url, timestamp, status, is_deleted)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'sent', 0)
        RETURNING id
        "#,
    )
    .bind(chat_id)
    .bind(from_id)
    .bind(to_id)
    .bind(&payload.content)
    .bind(message_type.as_str())
    .bind(&payload.image_url)
    .bind(&payload.voice_url)
    .bind(&payload.file_url)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE chats SET last_msg = ?, last_msg_time = ?, updated_at = ? WHERE id = ?")
        .bind(preview_text(message_type, payload.content.as_deref()))
        .bind(&now)
        .bind(&now)
        .bind(chat_id)
        .execute(&mut *tx)
        .await?;

    let view = fetch_view(&mut *tx, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message"))?;
    tx.commit().await?;

    tracing::debug!("Message {} stored in chat {} ({})", message_id, chat_id, message_type.as_str());
    Ok(view)
}

/// Most recent non-deleted messages of a chat, oldest first
///
/// When `viewer` is given, messages addressed to them are marked read after
/// the page is read; the returned page still shows their previous status.
pub async fn list_messages(
    pool: &SqlitePool,
    chat_id: i64,
    limit: Option<i64>,
    viewer: Option<i64>,
) -> BackendResult<Vec<MessageView>> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let mut tx = match viewer {
        Some(_) => begin_write(pool).await?,
        None => pool.begin().await?,
    };
    let rows = sqlx::query_as::<_, MessageViewRow>(&format!(
        "{} WHERE m.chat_id = ? AND m.is_deleted = 0 ORDER BY m.timestamp DESC, m.id DESC LIMIT ?",
        VIEW_SELECT
    ))
    .bind(chat_id)
    .bind(limit)
    .fetch_all(&mut *tx)
    .await?;

    if let Some(user_id) = viewer {
        mark_read(&mut *tx, chat_id, user_id).await?;
    }
    tx.commit().await?;

    let mut messages = rows
        .into_iter()
        .map(MessageView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    messages.reverse();

    Ok(messages)
}

/// Mark every `sent` message of a chat addressed to `user_id` as read
///
/// Returns the number of messages that changed.
pub async fn mark_read<'e, E>(executor: E, chat_id: i64, user_id: i64) -> BackendResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let updated = sqlx::query(
        "UPDATE messages SET status = 'read' WHERE chat_id = ? AND to_id = ? AND status = 'sent'",
    )
    .bind(chat_id)
    .bind(user_id)
    .execute(executor)
    .await?
    .rows_affected();

    Ok(updated)
}

/// Get a message by ID, including soft-deleted ones
pub async fn get_message<'e, E>(executor: E, message_id: i64) -> BackendResult<Option<Message>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, MessageRow>(&format!(
        "SELECT {} FROM messages WHERE id = ?",
        MESSAGE_COLUMNS
    ))
    .bind(message_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Message::try_from).transpose()?)
}

/// Soft-delete a message on behalf of its sender
///
/// Deleting an already deleted message succeeds again.
///
/// # Errors
/// * `NotFound` - no such message
/// * `PermissionDenied` - `requester` did not send it
pub async fn soft_delete_message(
    pool: &SqlitePool,
    message_id: i64,
    requester: i64,
) -> BackendResult<Message> {
    let mut tx = begin_write(pool).await?;

    let message = get_message(&mut *tx, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message"))?;

    if message.from_id != requester {
        return Err(BackendError::permission_denied(
            "Only the sender can delete a message",
        ));
    }

    if !message.is_deleted {
        sqlx::query("UPDATE messages SET is_deleted = 1 WHERE id = ?")
            .bind(message_id)
            .execute(&mut *tx)
            .await?;
        tracing::info!("Message {} deleted by user {}", message_id, requester);
    }
    tx.commit().await?;

    Ok(Message {
        is_deleted: true,
        ..message
    })
}

/// Total unread messages addressed to a user across their chats
pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> BackendResult<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM messages m
        JOIN chat_participants cp ON cp.chat_id = m.chat_id AND cp.user_id = m.to_id
        WHERE m.to_id = ? AND m.status = 'sent' AND m.is_deleted = 0
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
