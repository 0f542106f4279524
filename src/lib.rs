//! TravelMate - Messaging Backend
//!
//! The backend of a travel companion app: user accounts, friend requests,
//! private one-to-one chats with read state, tourist/guide bindings,
//! onboarding surveys, trip feedback with rewards, guide-handled password
//! resets and saved itineraries, served as a JSON API over a SQLite store.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared by the API and its clients
//!   - Friend requests, friends, chats, messages, bindings
//!   - Survey answers, feedback, itineraries
//!   - Lenient id parsing, validation errors
//!
//! - **`backend`** - Server-side code
//!   - Axum router, handlers and auth middleware
//!   - sqlx/SQLite store with migrations
//!   - Error mapping to HTTP responses
//!
//! # Usage
//!
//! ```rust,no_run
//! use travelmate::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let (app, state) = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind(state.config.listen_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
