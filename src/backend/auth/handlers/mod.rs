//! Authentication and account handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`me`** - GET /api/auth/me
//! - **`directory`** - user listing, stats, search, profile update
//! - **`reset`** - forgotten-password requests handled by guides
//! - **`types`** - request/response types

pub mod types;
pub mod register;
pub mod login;
pub mod me;
pub mod directory;
pub mod reset;

pub use register::register;
pub use login::login;
pub use me::get_me;
pub use directory::{list_users, search_users, update_profile, user_stats};
pub use reset::{forgot_password, process_reset, reset_requests};
