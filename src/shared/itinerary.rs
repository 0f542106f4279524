//! Itinerary Data Structures
//!
//! Each user keeps one itinerary. Its items are planned by the client and
//! stored as opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::ids::optional_id;

/// A user's saved itinerary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Rendered as a string like the ids handed out at login
    pub user_id: String,
    pub itinerary_items: Vec<Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// Query string of `GET`/`DELETE /itinerary`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
}

/// Body of `POST /itinerary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItineraryRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub itinerary_items: Option<Vec<Value>>,
}

/// `data` holds zero or one itinerary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub success: bool,
    pub data: Vec<Itinerary>,
}
