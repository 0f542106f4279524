//! Onboarding Survey
//!
//! A user submits the preference survey once after registering; guides read
//! the aggregated answers.

pub mod db;
pub mod handlers;

pub use handlers::*;
