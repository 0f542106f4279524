//! Backend Module
//!
//! All server-side code of TravelMate: an Axum HTTP server over a SQLite
//! store, serving accounts, friends, private chats, tourist/guide
//! bindings, surveys, feedback and itineraries.
//!
//! # Architecture
//!
//! - **`server`** - initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`store`** - database handle, migrations, timestamps
//! - **`auth`** - registration, login, JWT, user directory
//! - **`messaging`** - friend requests, friends, chats, messages
//! - **`guide`** - tourist/guide bindings
//! - **`survey`** - onboarding survey
//! - **`feedback`** - trip feedback and rewards
//! - **`itinerary`** - saved trip plans
//! - **`middleware`** - bearer token authentication
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── store/          - SQLite pool
//! ├── auth/           - Accounts
//! ├── messaging/      - Friends, chats, messages
//! ├── guide/          - Guide bindings
//! ├── survey/         - Onboarding survey
//! ├── feedback/       - Feedback and rewards
//! ├── itinerary/      - Itineraries
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Consistency
//!
//! Operations that change several rows (accepting a friend request, sending
//! a message) run in one SQLite transaction. Pair uniqueness (one private
//! chat per user pair, one friend edge per direction, one pending request
//! per direction) is enforced by unique indexes, so concurrent requests
//! converge instead of duplicating rows.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`; `BackendError` maps to a status code
//! and a `{success: false, message}` JSON body.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Persistent store
pub mod store;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Friends, chats and messages
pub mod messaging;

/// Tourist/guide bindings
pub mod guide;

/// Onboarding survey
pub mod survey;

/// Feedback and rewards
pub mod feedback;

/// Saved itineraries
pub mod itinerary;

/// Middleware for request processing
pub mod middleware;
