//! Survey HTTP Handlers
//!
//! # Routes
//!
//! - `POST /api/survey/submit` - store a user's answers
//! - `GET /api/survey/stats` - answer counts per question

use axum::{extract::State, Json};

use super::db;
use crate::backend::error::BackendResult;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::survey::{SubmitSurveyRequest, SubmitSurveyResponse, SurveyStatsResponse};

pub async fn submit_survey(
    State(db): State<Database>,
    Json(request): Json<SubmitSurveyRequest>,
) -> BackendResult<Json<SubmitSurveyResponse>> {
    let user_id = require(request.user_id, "userId")?;
    let submission_id = db::submit_survey(db.pool(), user_id, &request.answers).await?;

    Ok(Json(SubmitSurveyResponse {
        success: true,
        message: "Survey submitted".to_string(),
        submission_id,
    }))
}

pub async fn survey_stats(State(db): State<Database>) -> BackendResult<Json<SurveyStatsResponse>> {
    let stats = db::survey_stats(db.pool()).await?;
    Ok(Json(SurveyStatsResponse {
        success: true,
        stats,
    }))
}
