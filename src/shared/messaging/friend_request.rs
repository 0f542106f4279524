//! Friend Request Data Structure
//!
//! Represents friend requests between users.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::ids::optional_id;
use crate::shared::user::PublicProfile;

/// Status of a friend request
///
/// A request starts `Pending` and is resolved exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// Request is waiting for the recipient
    #[default]
    Pending,
    /// Request was accepted
    Accepted,
    /// Request was rejected
    Rejected,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
            FriendRequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FriendRequestStatus::Pending),
            "accepted" => Ok(FriendRequestStatus::Accepted),
            "rejected" => Ok(FriendRequestStatus::Rejected),
            _ => Err(SharedError::unknown("friend request status", s)),
        }
    }
}

/// Represents a friend request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Unique request ID
    pub id: i64,
    /// User who sent the request
    pub from_id: i64,
    /// User who received the request
    pub to_id: i64,
    /// Current status of the request
    #[serde(default)]
    pub status: FriendRequestStatus,
    /// Optional note from the sender
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FriendRequest {
    /// Check if the request is pending
    pub fn is_pending(&self) -> bool {
        self.status == FriendRequestStatus::Pending
    }
}

/// Incoming request as shown to its recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFriendRequest {
    #[serde(flatten)]
    pub request: FriendRequest,
    /// Sender's public profile
    pub from_user: PublicProfile,
}

/// Request to send a friend request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub from_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub to_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response after sending a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestResponse {
    pub success: bool,
    pub message: String,
    pub request_id: i64,
}

/// Body of `/friends/accept` and `/friends/reject`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondFriendRequestRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub request_id: Option<i64>,
}

/// Response after accepting a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptFriendRequestResponse {
    pub success: bool,
    pub message: String,
    /// Private chat linking the two users
    pub chat_id: i64,
    /// Whether the chat was created by this acceptance
    pub is_new: bool,
}

/// Response for listing friend requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFriendRequestsResponse {
    pub success: bool,
    pub requests: Vec<IncomingFriendRequest>,
}
