//! Chat Message Data Structure
//!
//! Represents a message in a chat session.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::ids::optional_id;

/// Longest text preview stored on a chat, in characters
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Type of message content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Plain text message
    #[default]
    Text,
    /// Image, referenced by `imageUrl`
    Image,
    /// Voice clip, referenced by `voiceUrl`
    Voice,
    /// File attachment, referenced by `fileUrl`
    File,
}

impl MessageType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Voice => "voice",
            MessageType::File => "file",
        }
    }

    /// Parse from string (request body or database)
    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "voice" => Ok(MessageType::Voice),
            "file" => Ok(MessageType::File),
            _ => Err(SharedError::unknown("message type", s)),
        }
    }
}

/// Delivery state of a message
///
/// Only `Sent -> Read` is ever written. `Delivered` exists so that rows
/// written by other clients still decode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "read" => Ok(MessageStatus::Read),
            _ => Err(SharedError::unknown("message status", s)),
        }
    }
}

/// Content of a message besides its routing fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePayload {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub voice_url: Option<String>,
    pub file_url: Option<String>,
}

impl MessagePayload {
    /// Text-only payload
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Text stored as a chat's `lastMsg` after a message of this type
///
/// Text is cut to [`PREVIEW_MAX_CHARS`] characters with a trailing `...`;
/// media messages get a placeholder.
pub fn preview_text(message_type: MessageType, content: Option<&str>) -> String {
    match message_type {
        MessageType::Text => {
            let content = content.unwrap_or_default();
            if content.chars().count() <= PREVIEW_MAX_CHARS {
                content.to_string()
            } else {
                let mut preview: String = content.chars().take(PREVIEW_MAX_CHARS - 3).collect();
                preview.push_str("...");
                preview
            }
        }
        MessageType::Image => "[image]".to_string(),
        MessageType::Voice => "[voice]".to_string(),
        MessageType::File => "[file]".to_string(),
    }
}

/// Represents a stored chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID
    pub id: i64,
    /// Chat this message belongs to
    pub chat_id: i64,
    /// Sender
    pub from_id: i64,
    /// Recipient
    pub to_id: i64,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub image_url: Option<String>,
    pub voice_url: Option<String>,
    pub file_url: Option<String>,
    /// When the message was sent (RFC3339 string)
    pub timestamp: String,
    pub status: MessageStatus,
    /// Soft-delete flag; deleted messages are hidden from listings only
    pub is_deleted: bool,
}

/// Display fields of a message's sender or recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageParty {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
}

/// A message joined with its sender and recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub from: MessageParty,
    pub to: MessageParty,
}

/// Request to send a message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub chat_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub from: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub to: Option<i64>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub voice_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl SendMessageRequest {
    /// Split off the content fields
    pub fn payload(&self) -> MessagePayload {
        MessagePayload {
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            voice_url: self.voice_url.clone(),
            file_url: self.file_url.clone(),
        }
    }
}

/// Response after sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: MessageView,
}

/// Response carrying a single message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessageResponse {
    pub success: bool,
    pub message: Message,
}

/// Response for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}

/// Body of `/messages/read`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub chat_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
}

/// Response after marking a chat read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub message: String,
    /// Number of messages moved from `sent` to `read`
    pub updated: u64,
}

/// Response for the unread counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub success: bool,
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_placeholders() {
        assert_eq!(preview_text(MessageType::Image, None), "[image]");
        assert_eq!(preview_text(MessageType::Voice, Some("ignored")), "[voice]");
        assert_eq!(preview_text(MessageType::File, None), "[file]");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let short = "hello";
        assert_eq!(preview_text(MessageType::Text, Some(short)), "hello");

        let long: String = "旅".repeat(150);
        let preview = preview_text(MessageType::Text, Some(&long));
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_message_type_parse() {
        assert_eq!(MessageType::parse("voice").unwrap(), MessageType::Voice);
        assert!(MessageType::parse("video").is_err());
    }

    #[test]
    fn test_send_request_type_field() {
        let req: SendMessageRequest = serde_json::from_str(
            r#"{"chatId": 1, "from": "2", "to": 3, "type": "image", "imageUrl": "/u/a.png"}"#,
        )
        .unwrap();
        assert_eq!(req.message_type.as_deref(), Some("image"));
        assert_eq!(req.from, Some(2));
        assert_eq!(req.payload().image_url.as_deref(), Some("/u/a.png"));
    }

    #[test]
    fn test_message_view_flattens_message() {
        let view = MessageView {
            message: Message {
                id: 1,
                chat_id: 2,
                from_id: 3,
                to_id: 4,
                content: Some("hi".to_string()),
                message_type: MessageType::Text,
                image_url: None,
                voice_url: None,
                file_url: None,
                timestamp: "2025-01-01T00:00:00.000000Z".to_string(),
                status: MessageStatus::Sent,
                is_deleted: false,
            },
            from: MessageParty { id: 3, username: "a".to_string(), avatar: None },
            to: MessageParty { id: 4, username: "b".to_string(), avatar: None },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["chatId"], 2);
        assert_eq!(json["type"], "text");
        assert_eq!(json["status"], "sent");
        assert_eq!(json["from"]["username"], "a");
    }
}
