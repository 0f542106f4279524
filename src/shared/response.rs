//! Generic response envelope
//!
//! Every JSON response carries a `success` flag. Endpoints that only report
//! an outcome use `ActionResponse`; the rest define their own body next to
//! their request type.

use serde::{Deserialize, Serialize};

/// `{success, message}` body for endpoints with no payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
