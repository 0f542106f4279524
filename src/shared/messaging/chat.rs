//! Chat Session Data Structure
//!
//! Represents a chat between two (private) or more (group) users.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::ids::optional_id;
use crate::shared::user::PublicProfile;

/// Kind of chat session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    #[default]
    Private,
    Group,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "private" => Ok(ChatType::Private),
            "group" => Ok(ChatType::Group),
            _ => Err(SharedError::unknown("chat type", s)),
        }
    }
}

/// Key identifying the private chat of an unordered user pair
///
/// `pair_key(3, 1)` and `pair_key(1, 3)` are both `"1:3"`.
pub fn pair_key(user_a: i64, user_b: i64) -> String {
    let (low, high) = if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };
    format!("{}:{}", low, high)
}

/// A chat as listed for one of its participants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// Unique chat ID
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    /// Everyone in the chat except the viewer
    pub participants: Vec<PublicProfile>,
    /// Preview text of the last message
    pub last_msg: Option<String>,
    /// Timestamp of the last message
    pub last_msg_time: Option<String>,
    /// Messages addressed to the viewer that are still `sent`
    pub unread_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatSummary {
    /// Get the other participant (for private chats)
    pub fn other_participant(&self) -> Option<&PublicProfile> {
        self.participants.first()
    }
}

/// Response for listing chats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChatsResponse {
    pub success: bool,
    pub chats: Vec<ChatSummary>,
}

/// Request to get or create a private chat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChatRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id1: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id2: Option<i64>,
}

/// Response after get-or-create of a private chat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChatResponse {
    pub success: bool,
    pub chat_id: i64,
    pub is_new: bool,
}
