//! Itinerary API integration tests

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestDatabase;
use travelmate::shared::UserRole;

#[tokio::test]
async fn test_itinerary_save_replace_delete() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let alice = db.create_test_user("alice", UserRole::Tourist).await;

    let body: Value = server
        .get("/api/itinerary")
        .add_query_param("userId", alice)
        .await
        .json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));

    let items = json!([{ "place": "Temple of Heaven", "day": 1 }]);
    let response = server
        .post("/api/itinerary")
        .json(&json!({ "userId": alice.to_string(), "itineraryItems": items }))
        .await;
    response.assert_status_ok();

    let replaced = json!([{ "place": "Summer Palace", "day": 2 }, { "place": "Hutong walk" }]);
    server
        .post("/api/itinerary")
        .json(&json!({ "userId": alice, "itineraryItems": replaced }))
        .await
        .assert_status_ok();

    let body: Value = server
        .get("/api/itinerary")
        .add_query_param("userId", alice)
        .await
        .json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["userId"], alice.to_string());
    assert_eq!(data[0]["itineraryItems"], replaced);

    server
        .delete("/api/itinerary")
        .add_query_param("userId", alice)
        .await
        .assert_status_ok();
    let body: Value = server
        .get("/api/itinerary")
        .add_query_param("userId", alice)
        .await
        .json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_itinerary_validation() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let alice = db.create_test_user("alice", UserRole::Tourist).await;

    let response = server.get("/api/itinerary").await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "userId");

    let response = server
        .post("/api/itinerary")
        .json(&json!({ "userId": alice }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "itineraryItems");

    let response = server
        .post("/api/itinerary")
        .json(&json!({ "userId": 404, "itineraryItems": [] }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND);
}
