//! Chat session handlers
//!
//! # Routes
//!
//! - `GET /api/chats?userId=` - the user's chats with unread counts
//! - `POST /api/chats/private` - get or create the private chat of two users

use axum::{
    extract::{Query, State},
    Json,
};

use crate::backend::error::BackendResult;
use crate::backend::messaging::db;
use crate::backend::messaging::handlers::params::UserQuery;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::messaging::{ListChatsResponse, PrivateChatRequest, PrivateChatResponse};

/// List a user's chats
pub async fn list_chats(
    State(db): State<Database>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<ListChatsResponse>> {
    let user_id = require(query.user_id, "userId")?;
    let chats = db::list_chats_for_user(db.pool(), user_id).await?;

    Ok(Json(ListChatsResponse {
        success: true,
        chats,
    }))
}

/// Get or create a private chat
pub async fn get_or_create_private_chat(
    State(db): State<Database>,
    Json(request): Json<PrivateChatRequest>,
) -> BackendResult<Json<PrivateChatResponse>> {
    let user1 = require(request.user_id1, "userId1")?;
    let user2 = require(request.user_id2, "userId2")?;

    let (chat_id, is_new) = db::get_or_create_private_chat(db.pool(), user1, user2).await?;

    Ok(Json(PrivateChatResponse {
        success: true,
        chat_id,
        is_new,
    }))
}
