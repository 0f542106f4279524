//! Guide Binding HTTP Handlers
//!
//! # Routes
//!
//! - `POST /api/bind_guide` - tourist asks for a guide
//! - `POST /api/review_bind_request` - guide approves or rejects
//! - `POST /api/unbind_guide` - tourist drops all bindings
//! - `GET /api/binding/guide/{touristId}` - the tourist's approved guide
//! - `GET /api/binding/pending/{guideId}` - requests waiting for a guide
//! - `GET /api/binding/tourists/{guideId}` - tourists a guide has approved
//! - `POST /api/binding/cleanup` - drop duplicate rows

use axum::{
    extract::{Path, State},
    Json,
};

use super::db;
use crate::backend::error::BackendResult;
use crate::backend::store::Database;
use crate::shared::binding::{
    BindGuideRequest, BindGuideResponse, BindingStatus, BoundTouristsResponse, CleanupResponse,
    GuideBindingResponse, PendingBindingsResponse, ReviewBindingRequest, UnbindGuideRequest,
    UnbindGuideResponse,
};
use crate::shared::error::require;
use crate::shared::ActionResponse;

pub async fn bind_guide(
    State(db): State<Database>,
    Json(request): Json<BindGuideRequest>,
) -> BackendResult<Json<BindGuideResponse>> {
    let tourist_id = require(request.tourist_id, "touristId")?;
    let guide_id = require(request.guide_id, "guideId")?;

    let binding = db::bind_guide(db.pool(), tourist_id, guide_id).await?;

    Ok(Json(BindGuideResponse {
        success: true,
        message: "Binding request sent".to_string(),
        binding_id: binding.id,
    }))
}

pub async fn review_bind_request(
    State(db): State<Database>,
    Json(request): Json<ReviewBindingRequest>,
) -> BackendResult<Json<ActionResponse>> {
    let binding_id = require(request.binding_id, "bindingId")?;
    let status = BindingStatus::parse(require(request.status.as_deref(), "status")?)?;

    let binding = db::review_binding(db.pool(), binding_id, status).await?;

    Ok(Json(ActionResponse::ok(format!(
        "Binding {}",
        binding.status.as_str()
    ))))
}

pub async fn unbind_guide(
    State(db): State<Database>,
    Json(request): Json<UnbindGuideRequest>,
) -> BackendResult<Json<UnbindGuideResponse>> {
    let tourist_id = require(request.tourist_id, "touristId")?;
    let removed = db::unbind_guide(db.pool(), tourist_id).await?;

    Ok(Json(UnbindGuideResponse {
        success: true,
        message: "Guide unbound".to_string(),
        removed,
    }))
}

pub async fn binding_for_tourist(
    State(db): State<Database>,
    Path(tourist_id): Path<i64>,
) -> BackendResult<Json<GuideBindingResponse>> {
    let binding = db::binding_for_tourist(db.pool(), tourist_id).await?;
    Ok(Json(GuideBindingResponse {
        success: true,
        binding,
    }))
}

pub async fn pending_for_guide(
    State(db): State<Database>,
    Path(guide_id): Path<i64>,
) -> BackendResult<Json<PendingBindingsResponse>> {
    let requests = db::pending_for_guide(db.pool(), guide_id).await?;
    Ok(Json(PendingBindingsResponse {
        success: true,
        requests,
    }))
}

pub async fn tourists_for_guide(
    State(db): State<Database>,
    Path(guide_id): Path<i64>,
) -> BackendResult<Json<BoundTouristsResponse>> {
    let tourists = db::tourists_for_guide(db.pool(), guide_id).await?;
    Ok(Json(BoundTouristsResponse {
        success: true,
        tourists,
    }))
}

pub async fn cleanup_bindings(State(db): State<Database>) -> BackendResult<Json<CleanupResponse>> {
    let cleaned_count = db::cleanup_duplicate_bindings(db.pool()).await?;
    Ok(Json(CleanupResponse {
        success: true,
        message: format!("Removed {} duplicate bindings", cleaned_count),
        cleaned_count,
    }))
}
