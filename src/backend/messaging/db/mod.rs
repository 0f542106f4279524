//! Database operations for messaging
//!
//! - **`friends`** - friend requests and friend edges
//! - **`chats`** - private chat sessions and their participants
//! - **`messages`** - message storage, read state and soft delete

pub mod friends;
pub mod chats;
pub mod messages;

pub use friends::{
    accept_friend_request, add_friend, are_friends, get_friend_request, list_friends,
    list_incoming_requests, reject_friend_request, remove_friend, send_friend_request,
    AcceptOutcome,
};
pub use chats::{get_chat, get_or_create_private_chat, is_participant, list_chats_for_user, ChatRow};
pub use messages::{
    get_message, list_messages, mark_read, send_message, soft_delete_message, unread_count,
    NewMessage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::backend::auth::users::{create_user, NewUser};
    use crate::backend::store::Database;
    use crate::shared::UserRole;

    pub async fn memory_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    /// Create one tourist per name and return their ids in order
    pub async fn create_users<const N: usize>(db: &Database, names: [&str; N]) -> [i64; N] {
        let mut ids = [0; N];
        for (slot, name) in ids.iter_mut().zip(names) {
            let user = create_user(
                db.pool(),
                NewUser {
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    password_hash: "not-a-real-hash".to_string(),
                    role: UserRole::Tourist,
                },
            )
            .await
            .unwrap();
            *slot = user.id;
        }
        ids
    }
}
