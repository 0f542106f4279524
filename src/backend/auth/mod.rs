//! Authentication and User Management
//!
//! - **`users`** - user rows and their queries
//! - **`sessions`** - JWT issuing and verification
//! - **`resets`** - password reset requests
//! - **`handlers`** - HTTP handlers for accounts

pub mod users;
pub mod sessions;
pub mod resets;
pub mod handlers;

pub use handlers::{
    forgot_password, get_me, list_users, login, process_reset, register, reset_requests,
    search_users, update_profile, user_stats,
};
