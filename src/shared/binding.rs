//! Tourist/Guide Binding Data Structures
//!
//! A tourist asks to be bound to a guide; the guide approves or rejects.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::ids::optional_id;
use crate::shared::user::PublicProfile;

/// Review state of a binding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl BindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingStatus::Pending => "pending",
            BindingStatus::Approved => "approved",
            BindingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "pending" => Ok(BindingStatus::Pending),
            "approved" => Ok(BindingStatus::Approved),
            "rejected" => Ok(BindingStatus::Rejected),
            _ => Err(SharedError::unknown("binding status", s)),
        }
    }
}

/// A binding row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuideBinding {
    pub id: i64,
    pub tourist_id: i64,
    pub guide_id: i64,
    pub status: BindingStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A binding together with the profile of the user on the other end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BindingWithProfile {
    #[serde(flatten)]
    pub binding: GuideBinding,
    /// The guide for a tourist's view, the tourist for a guide's view
    pub user: PublicProfile,
}

/// Body of `/bind_guide`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindGuideRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub tourist_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub guide_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindGuideResponse {
    pub success: bool,
    pub message: String,
    pub binding_id: i64,
}

/// Body of `/review_bind_request`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBindingRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub binding_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `/unbind_guide`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbindGuideRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub tourist_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbindGuideResponse {
    pub success: bool,
    pub message: String,
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideBindingResponse {
    pub success: bool,
    /// `None` when the tourist has no approved guide
    pub binding: Option<BindingWithProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBindingsResponse {
    pub success: bool,
    pub requests: Vec<BindingWithProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundTouristsResponse {
    pub success: bool,
    pub tourists: Vec<PublicProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
    pub cleaned_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_status_parse() {
        assert_eq!(BindingStatus::parse("approved").unwrap(), BindingStatus::Approved);
        assert!(BindingStatus::parse("APPROVED").is_err());
    }
}
