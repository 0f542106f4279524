//! Message handlers
//!
//! # Routes
//!
//! - `GET /api/messages?chatId=&limit=&userId=` - page of a chat, marks it read for `userId`
//! - `POST /api/messages/send` - send a message
//! - `POST /api/messages/read` - mark a chat read for a user
//! - `GET /api/messages/unread?userId=` - unread total
//! - `GET /api/messages/{id}` - a single message, deleted or not
//! - `DELETE /api/messages/{id}?userId=` - soft delete by the sender

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::messaging::db::{self, NewMessage};
use crate::backend::messaging::handlers::params::{ListMessagesQuery, UserQuery};
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::messaging::{
    GetMessageResponse, ListMessagesResponse, MarkReadRequest, MarkReadResponse, MessageType,
    SendMessageRequest, SendMessageResponse, UnreadCountResponse,
};
use crate::shared::ActionResponse;

/// List messages of a chat
pub async fn list_messages(
    State(db): State<Database>,
    Query(query): Query<ListMessagesQuery>,
) -> BackendResult<Json<ListMessagesResponse>> {
    let chat_id = require(query.chat_id, "chatId")?;
    let messages = db::list_messages(db.pool(), chat_id, query.limit, query.user_id).await?;

    Ok(Json(ListMessagesResponse {
        success: true,
        messages,
    }))
}

/// Send a message
pub async fn send_message(
    State(db): State<Database>,
    Json(request): Json<SendMessageRequest>,
) -> BackendResult<Json<SendMessageResponse>> {
    let chat_id = require(request.chat_id, "chatId")?;
    let from_id = require(request.from, "from")?;
    let to_id = require(request.to, "to")?;
    let message_type = MessageType::parse(require(request.message_type.as_deref(), "type")?)?;

    let message = db::send_message(
        db.pool(),
        NewMessage {
            chat_id,
            from_id,
            to_id,
            message_type,
            payload: request.payload(),
        },
    )
    .await?;

    Ok(Json(SendMessageResponse {
        success: true,
        message,
    }))
}

/// Mark all messages of a chat addressed to a user as read
pub async fn mark_read(
    State(db): State<Database>,
    Json(request): Json<MarkReadRequest>,
) -> BackendResult<Json<MarkReadResponse>> {
    let chat_id = require(request.chat_id, "chatId")?;
    let user_id = require(request.user_id, "userId")?;

    let updated = db::mark_read(db.pool(), chat_id, user_id).await?;
    tracing::debug!("Marked {} messages read in chat {} for user {}", updated, chat_id, user_id);

    Ok(Json(MarkReadResponse {
        success: true,
        message: "Messages marked as read".to_string(),
        updated,
    }))
}

/// Unread total of a user
pub async fn unread_count(
    State(db): State<Database>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<UnreadCountResponse>> {
    let user_id = require(query.user_id, "userId")?;
    let unread_count = db::unread_count(db.pool(), user_id).await?;

    Ok(Json(UnreadCountResponse {
        success: true,
        unread_count,
    }))
}

/// Get a message by id
pub async fn get_message(
    State(db): State<Database>,
    Path(message_id): Path<i64>,
) -> BackendResult<Json<GetMessageResponse>> {
    let message = db::get_message(db.pool(), message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message"))?;

    Ok(Json(GetMessageResponse {
        success: true,
        message,
    }))
}

/// Soft-delete a message
pub async fn delete_message(
    State(db): State<Database>,
    Path(message_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(query.user_id, "userId")?;
    db::soft_delete_message(db.pool(), message_id, user_id).await?;

    Ok(Json(ActionResponse::ok("Message deleted")))
}
