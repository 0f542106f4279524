//! Friend request and friend list handlers
//!
//! # Routes
//!
//! - `POST /api/friends/request` - send a friend request
//! - `GET /api/friends/requests?userId=` - pending requests addressed to a user
//! - `POST /api/friends/accept` - accept, creating the friend edges and private chat
//! - `POST /api/friends/reject` - reject
//! - `GET /api/friends?userId=` - list friends
//! - `POST /api/friends/add` - direct add without a request
//! - `DELETE /api/friends/{friendId}?userId=` - remove a friend

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::backend::error::{BackendError, BackendResult, ConflictKind};
use crate::backend::messaging::db;
use crate::backend::messaging::handlers::params::UserQuery;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::messaging::{
    AcceptFriendRequestResponse, AddFriendRequest, ListFriendRequestsResponse,
    ListFriendsResponse, RespondFriendRequestRequest, SendFriendRequestRequest,
    SendFriendRequestResponse,
};
use crate::shared::ActionResponse;

/// Send a friend request
pub async fn send_friend_request(
    State(db): State<Database>,
    Json(request): Json<SendFriendRequestRequest>,
) -> BackendResult<Json<SendFriendRequestResponse>> {
    let from_id = require(request.from_id, "fromId")?;
    let to_id = require(request.to_id, "toId")?;
    let note = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty());

    let created = db::send_friend_request(db.pool(), from_id, to_id, note).await?;

    Ok(Json(SendFriendRequestResponse {
        success: true,
        message: "Friend request sent".to_string(),
        request_id: created.id,
    }))
}

/// Get pending friend requests addressed to a user
pub async fn list_friend_requests(
    State(db): State<Database>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<ListFriendRequestsResponse>> {
    let user_id = require(query.user_id, "userId")?;
    let requests = db::list_incoming_requests(db.pool(), user_id).await?;

    Ok(Json(ListFriendRequestsResponse {
        success: true,
        requests,
    }))
}

/// Accept a friend request
pub async fn accept_friend_request(
    State(db): State<Database>,
    Json(request): Json<RespondFriendRequestRequest>,
) -> BackendResult<Json<AcceptFriendRequestResponse>> {
    let request_id = require(request.request_id, "requestId")?;
    let outcome = db::accept_friend_request(db.pool(), request_id).await?;

    Ok(Json(AcceptFriendRequestResponse {
        success: true,
        message: "Friend request accepted".to_string(),
        chat_id: outcome.chat_id,
        is_new: outcome.is_new,
    }))
}

/// Reject a friend request
pub async fn reject_friend_request(
    State(db): State<Database>,
    Json(request): Json<RespondFriendRequestRequest>,
) -> BackendResult<Json<ActionResponse>> {
    let request_id = require(request.request_id, "requestId")?;
    db::reject_friend_request(db.pool(), request_id).await?;

    Ok(Json(ActionResponse::ok("Friend request rejected")))
}

/// List a user's friends
pub async fn list_friends(
    State(db): State<Database>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<ListFriendsResponse>> {
    let user_id = require(query.user_id, "userId")?;
    let friends = db::list_friends(db.pool(), user_id).await?;

    Ok(Json(ListFriendsResponse {
        success: true,
        friends,
    }))
}

/// Add a friend directly
pub async fn add_friend(
    State(db): State<Database>,
    Json(request): Json<AddFriendRequest>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(request.user_id, "userId")?;
    let friend_id = require(request.friend_id, "friendId")?;

    if !db::add_friend(db.pool(), user_id, friend_id).await? {
        return Err(BackendError::conflict(ConflictKind::AlreadyFriends));
    }

    tracing::info!("Users {} and {} added as friends", user_id, friend_id);
    Ok(Json(ActionResponse::ok("Friend added")))
}

/// Remove a friend
pub async fn remove_friend(
    State(db): State<Database>,
    Path(friend_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(query.user_id, "userId")?;
    db::remove_friend(db.pool(), user_id, friend_id).await?;

    Ok(Json(ActionResponse::ok("Friend removed")))
}
