//! Feedback and Reward Data Structures
//!
//! Tourists rate their trip; a guide approves or rejects each feedback and
//! may attach a reward, which the tourist sees in their reward list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::ids::optional_id;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const DEFAULT_CATEGORY: &str = "general";

/// Review state of a feedback
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Approved => "approved",
            FeedbackStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "pending" => Ok(FeedbackStatus::Pending),
            "approved" => Ok(FeedbackStatus::Approved),
            "rejected" => Ok(FeedbackStatus::Rejected),
            _ => Err(SharedError::unknown("feedback status", s)),
        }
    }
}

/// A guide's decision on a feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    Approve,
    Reject,
}

impl FeedbackAction {
    pub fn parse(s: &str) -> Result<Self, SharedError> {
        match s {
            "approve" => Ok(FeedbackAction::Approve),
            "reject" => Ok(FeedbackAction::Reject),
            _ => Err(SharedError::unknown("feedback action", s)),
        }
    }

    /// Status a feedback ends up in
    pub fn status(&self) -> FeedbackStatus {
        match self {
            FeedbackAction::Approve => FeedbackStatus::Approved,
            FeedbackAction::Reject => FeedbackStatus::Rejected,
        }
    }
}

/// A feedback with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub rating: i64,
    pub content: Option<String>,
    pub category: String,
    pub status: FeedbackStatus,
    pub reward: Option<String>,
    pub guide_message: Option<String>,
    pub submitted_at: String,
    pub processed_at: Option<String>,
}

/// Body of `/feedback/submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub feedback_id: i64,
}

/// Query string of `/feedback/list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFeedbackParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One page of feedback, newest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPage {
    pub feedbacks: Vec<Feedback>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPageResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: FeedbackPage,
}

/// Body of `/feedback/{feedbackId}/process`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessFeedbackRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub feedback: Feedback,
}

/// An approved comment as shown on the public rating board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackComment {
    pub user: String,
    pub score: i64,
    pub content: Option<String>,
    pub submitted_at: String,
}

/// Rating distribution and comments of approved feedback
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackStats {
    /// rating -> count
    pub ratings: BTreeMap<i64, i64>,
    pub comments: Vec<FeedbackComment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackStatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: FeedbackStats,
}

/// A tourist's view of one of their feedbacks and its reward
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReward {
    pub id: i64,
    pub feedback_content: Option<String>,
    pub rating: i64,
    pub status: FeedbackStatus,
    pub reward: Option<String>,
    /// The guide's message
    pub message: Option<String>,
    pub created_at: String,
    pub processed_at: Option<String>,
}

impl From<Feedback> for FeedbackReward {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            feedback_content: feedback.content,
            rating: feedback.rating,
            status: feedback.status,
            reward: feedback.reward,
            message: feedback.guide_message,
            created_at: feedback.submitted_at,
            processed_at: feedback.processed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsResponse {
    pub success: bool,
    pub rewards: Vec<FeedbackReward>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_maps_to_status() {
        assert_eq!(FeedbackAction::parse("approve").unwrap().status(), FeedbackStatus::Approved);
        assert_eq!(FeedbackAction::parse("reject").unwrap().status(), FeedbackStatus::Rejected);
        assert!(FeedbackAction::parse("ignore").is_err());
    }

    #[test]
    fn test_stats_serialize_rating_keys_as_strings() {
        let mut stats = FeedbackStats::default();
        stats.ratings.insert(5, 2);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["ratings"]["5"], 2);
    }
}
