//! Friend Data Structure
//!
//! A confirmed friend as listed for one side of the (symmetric) relationship.

use serde::{Deserialize, Serialize};

use crate::shared::ids::optional_id;
use crate::shared::user::PublicProfile;

/// A user's friend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    #[serde(flatten)]
    pub profile: PublicProfile,
    /// When the friend edge was written
    pub friend_since: String,
}

/// Body of `/friends/add`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFriendRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub friend_id: Option<i64>,
}

/// Response for listing friends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFriendsResponse {
    pub success: bool,
    pub friends: Vec<Friend>,
}
