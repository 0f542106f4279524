//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router creation, middleware and layers
//! - **`api_routes`** - Public `/api` endpoints
//!
//! # Route Types
//!
//! ## Protected (bearer JWT)
//!
//! - `GET /api/users` - list users
//! - `GET /api/auth/me` - current account
//!
//! ## Public
//!
//! - `/api/auth/*`, `/api/users/*`, `/api/user/update_profile` - accounts
//! - `/api/friends*` - friend requests and friends
//! - `/api/chats*` - chat sessions
//! - `/api/messages*` - messages
//! - `/api/bind_guide`, `/api/binding/*` - tourist/guide bindings
//! - `/api/health` - health check

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
