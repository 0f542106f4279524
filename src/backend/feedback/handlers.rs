//! Feedback HTTP Handlers
//!
//! # Routes
//!
//! - `POST /api/feedback/submit` - tourist rates their trip
//! - `GET /api/feedback/list` - paged feedback for guides
//! - `POST /api/feedback/{feedbackId}/process` - approve or reject
//! - `GET /api/feedback/stats` - rating board of approved feedback
//! - `GET /api/feedbacks/user/{userId}/rewards` - a tourist's rewards

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::db::{self, NewFeedback};
use crate::backend::error::BackendResult;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::feedback::{
    FeedbackAction, FeedbackPageResponse, FeedbackStatsResponse, FeedbackStatus,
    ListFeedbackParams, ProcessFeedbackRequest, ProcessFeedbackResponse, RewardsResponse,
    SubmitFeedbackRequest, SubmitFeedbackResponse,
};

pub async fn submit_feedback(
    State(db): State<Database>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> BackendResult<Json<SubmitFeedbackResponse>> {
    let user_id = require(request.user_id, "userId")?;
    let rating = require(request.rating, "rating")?;

    let feedback = db::submit_feedback(
        db.pool(),
        NewFeedback {
            user_id,
            rating,
            content: request.content,
            category: request.category,
        },
    )
    .await?;

    Ok(Json(SubmitFeedbackResponse {
        success: true,
        message: "Thanks for your feedback".to_string(),
        feedback_id: feedback.id,
    }))
}

pub async fn list_feedback(
    State(db): State<Database>,
    Query(params): Query<ListFeedbackParams>,
) -> BackendResult<Json<FeedbackPageResponse>> {
    let status = params.status.as_deref().map(FeedbackStatus::parse).transpose()?;
    let page = db::list_feedback(db.pool(), status, params.page, params.limit).await?;

    Ok(Json(FeedbackPageResponse {
        success: true,
        page,
    }))
}

pub async fn process_feedback(
    State(db): State<Database>,
    Path(feedback_id): Path<i64>,
    Json(request): Json<ProcessFeedbackRequest>,
) -> BackendResult<Json<ProcessFeedbackResponse>> {
    let action = FeedbackAction::parse(require(request.action.as_deref(), "action")?)?;

    let feedback = db::process_feedback(
        db.pool(),
        feedback_id,
        action,
        request.reward.as_deref(),
        request.message.as_deref(),
    )
    .await?;

    let message = match action {
        FeedbackAction::Approve => "Feedback approved",
        FeedbackAction::Reject => "Feedback rejected",
    };
    Ok(Json(ProcessFeedbackResponse {
        success: true,
        message: message.to_string(),
        feedback,
    }))
}

pub async fn feedback_stats(State(db): State<Database>) -> BackendResult<Json<FeedbackStatsResponse>> {
    let stats = db::feedback_stats(db.pool()).await?;
    Ok(Json(FeedbackStatsResponse {
        success: true,
        stats,
    }))
}

pub async fn user_rewards(
    State(db): State<Database>,
    Path(user_id): Path<i64>,
) -> BackendResult<Json<RewardsResponse>> {
    let rewards = db::rewards_for_user(db.pool(), user_id).await?;
    Ok(Json(RewardsResponse {
        success: true,
        rewards,
    }))
}
