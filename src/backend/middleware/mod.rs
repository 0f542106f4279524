//! Middleware Module
//!
//! Request processing middleware.
//!
//! - **`auth`** - JWT bearer authentication for protected routes

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
