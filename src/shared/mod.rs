//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the HTTP layer and the store. They are the JSON wire format of the API.
//!
//! # Overview
//!
//! All wire types use camelCase field names and RFC 3339 timestamp strings.
//! Request bodies take ids either as numbers or numeric strings (see `ids`).

/// Shared error types
pub mod error;

/// Lenient id deserialization for request bodies
pub mod ids;

/// User roles and public profiles
pub mod user;

/// Tourist/guide binding types
pub mod binding;

/// Generic response envelope
pub mod response;

/// Friend, chat and message types
pub mod messaging;

/// Onboarding survey answers and statistics
pub mod survey;

/// Feedback, reviews and rewards
pub mod feedback;

/// Saved itineraries
pub mod itinerary;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use user::{PublicProfile, UserRole, UserStats};
pub use response::ActionResponse;
