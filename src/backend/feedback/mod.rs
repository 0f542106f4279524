//! Feedback and Rewards
//!
//! Tourists rate their trip, guides approve or reject the feedback and may
//! attach a reward.

pub mod db;
pub mod handlers;

pub use handlers::*;
