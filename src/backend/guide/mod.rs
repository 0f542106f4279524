//! Tourist/Guide Binding
//!
//! A tourist requests a guide, the guide reviews the request, and the
//! tourist can drop the binding again.

pub mod db;
pub mod handlers;

pub use handlers::*;
