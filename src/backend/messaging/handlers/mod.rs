//! Messaging HTTP Handlers
//!
//! Friend requests, friends, chat sessions and messages. User ids come from
//! the request body or query string.

pub mod params;
pub mod friends;
pub mod chats;
pub mod messages;

pub use friends::{
    accept_friend_request, add_friend, list_friend_requests, list_friends, reject_friend_request,
    remove_friend, send_friend_request,
};
pub use chats::{get_or_create_private_chat, list_chats};
pub use messages::{delete_message, get_message, list_messages, mark_read, send_message, unread_count};
