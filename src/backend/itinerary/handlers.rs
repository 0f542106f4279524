//! Itinerary HTTP Handlers
//!
//! # Routes
//!
//! - `GET /api/itinerary?userId=` - the user's itinerary, as a 0 or 1 item list
//! - `POST /api/itinerary` - save or replace it
//! - `DELETE /api/itinerary?userId=` - drop it

use axum::{
    extract::{Query, State},
    Json,
};

use super::db;
use crate::backend::error::BackendResult;
use crate::backend::store::Database;
use crate::shared::error::require;
use crate::shared::itinerary::{ItineraryQuery, ItineraryResponse, SaveItineraryRequest};
use crate::shared::ActionResponse;

pub async fn get_itinerary(
    State(db): State<Database>,
    Query(query): Query<ItineraryQuery>,
) -> BackendResult<Json<ItineraryResponse>> {
    let user_id = require(query.user_id, "userId")?;
    let itinerary = db::get_itinerary(db.pool(), user_id).await?;

    Ok(Json(ItineraryResponse {
        success: true,
        data: itinerary.into_iter().collect(),
    }))
}

pub async fn save_itinerary(
    State(db): State<Database>,
    Json(request): Json<SaveItineraryRequest>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(request.user_id, "userId")?;
    let items = require(request.itinerary_items, "itineraryItems")?;

    db::save_itinerary(db.pool(), user_id, &items).await?;
    Ok(Json(ActionResponse::ok("Itinerary saved")))
}

pub async fn delete_itinerary(
    State(db): State<Database>,
    Query(query): Query<ItineraryQuery>,
) -> BackendResult<Json<ActionResponse>> {
    let user_id = require(query.user_id, "userId")?;
    db::delete_itinerary(db.pool(), user_id).await?;
    Ok(Json(ActionResponse::ok("Itinerary deleted")))
}
