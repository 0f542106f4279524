//! Itineraries
//!
//! Each user saves one trip plan; saving again replaces it.

pub mod db;
pub mod handlers;

pub use handlers::*;
