//! Messaging Module
//!
//! This module contains all the data structures for the messaging system:
//!
//! - `FriendRequest` - A friend request between users
//! - `Friend` - One side of a confirmed friendship
//! - `ChatSummary` - A chat session as listed for a participant
//! - `Message` / `MessageView` - A message, optionally joined with its parties
//!
//! # Usage
//!
//! ```rust
//! use travelmate::shared::messaging::{ChatSummary, FriendRequest, Message};
//! ```

pub mod friend_request;
pub mod friend;
pub mod chat;
pub mod message;

// Re-export all types
pub use friend_request::{
    FriendRequest, FriendRequestStatus, IncomingFriendRequest, SendFriendRequestRequest,
    SendFriendRequestResponse, RespondFriendRequestRequest, AcceptFriendRequestResponse,
    ListFriendRequestsResponse,
};
pub use friend::{Friend, AddFriendRequest, ListFriendsResponse};
pub use chat::{
    pair_key, ChatSummary, ChatType, ListChatsResponse, PrivateChatRequest, PrivateChatResponse,
};
pub use message::{
    preview_text, GetMessageResponse, ListMessagesResponse, MarkReadRequest, MarkReadResponse,
    Message, MessageParty, MessagePayload, MessageStatus, MessageType, MessageView,
    SendMessageRequest, SendMessageResponse, UnreadCountResponse, PREVIEW_MAX_CHARS,
};
