//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory database fixtures
//! - Test server construction
//! - Authentication test helpers
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use database::*;
