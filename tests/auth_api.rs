//! Authentication API integration tests
//!
//! Registration, login, the token-protected routes and the user directory.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{register, register_and_login, register_and_login_as, TestDatabase, TEST_JWT_SECRET};
use travelmate::backend::auth::sessions::verify_token;

#[tokio::test]
async fn test_register_success() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let body = register(&server, "traveller_1", "secret123", "tourist").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "traveller_1");
    assert_eq!(body["user"]["role"], "tourist");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let db = TestDatabase::new().await;
    let server = db.server();
    register(&server, "alice", "secret123", "tourist").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret123"
        }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT, "Username");
}

#[tokio::test]
async fn test_register_validation() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "bob", "email": "bob@example.com", "password": "123" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "bob", "email": "not-an-email", "password": "secret123" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "bob@example.com", "password": "secret123" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "username");
}

#[tokio::test]
async fn test_login_by_username_and_email() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let user = register_and_login(&server, "alice").await;

    let claims = assert_ok!(verify_token(TEST_JWT_SECRET, &user.token));
    assert_eq!(claims.user_id(), Some(user.id));
    assert_eq!(claims.username, "alice");

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice@example.com", "password": user.password }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let db = TestDatabase::new().await;
    let server = db.server();
    register(&server, "alice", "secret123", "tourist").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED, "Invalid username or password");

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": "secret123" }))
        .await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let user = register_and_login(&server, "alice").await;

    let response = server.get("/api/users").await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED);

    let response = server.get("/api/auth/me").authorization_bearer("garbage").await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED);

    let response = server.get("/api/users").authorization_bearer(&user.token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    let body: Value = server
        .get("/api/auth/me")
        .authorization_bearer(&user.token)
        .await
        .json();
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_directory_search_stats_and_profile() {
    let db = TestDatabase::new().await;
    let server = db.server();
    register(&server, "anna", "secret123", "tourist").await;
    let guide = register(&server, "hannah", "secret123", "guide").await;

    let body: Value = server
        .get("/api/users/search")
        .add_query_param("keyword", "ann")
        .add_query_param("role", "guide")
        .await
        .json();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "hannah");

    let body: Value = server.get("/api/users/stats").await.json();
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["guides"], 1);
    assert_eq!(body["stats"]["tourists"], 1);

    let response = server
        .post("/api/user/update_profile")
        .json(&json!({ "userId": guide["user"]["id"], "avatar": "/avatars/h.png" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/user/update_profile")
        .json(&json!({ "userId": guide["user"]["id"], "username": "anna" }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let body: Value = server.get("/api/health").await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");

    let response = server.get("/api/does-not-exist").await;
    assert_error_response!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let tourist = register_and_login(&server, "alice").await;
    let guide = register_and_login_as(&server, "gus", "guide").await;

    let response = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND);

    let body: Value = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "alice@example.com" }))
        .await
        .json();
    assert_eq!(body["success"], true);
    let request_id = body["requestId"].as_i64().unwrap();

    let response = server.get("/api/auth/reset-requests").await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED);
    let response = server
        .get("/api/auth/reset-requests")
        .authorization_bearer(&tourist.token)
        .await;
    assert_error_response!(response, StatusCode::FORBIDDEN);

    let body: Value = server
        .get("/api/auth/reset-requests")
        .authorization_bearer(&guide.token)
        .await
        .json();
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["userId"], tourist.id);
    assert_eq!(requests[0]["email"], "alice@example.com");

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id, "action": "approve", "newUsername": "x", "newPassword": "secret456" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "Username");

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id, "action": "approve", "newUsername": "gus", "newPassword": "secret456" }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT);

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id.to_string(), "action": "approve", "newUsername": "alice_again", "newPassword": "secret456" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": tourist.password }))
        .await;
    assert_error_response!(response, StatusCode::UNAUTHORIZED);
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice_again", "password": "secret456" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id, "action": "reject" }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_reset_and_unknown_action() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let tourist = register_and_login(&server, "alice").await;
    let guide = register_and_login_as(&server, "gus", "guide").await;

    let body: Value = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "alice@example.com" }))
        .await
        .json();
    let request_id = body["requestId"].as_i64().unwrap();

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id, "action": "shrug" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/auth/process-reset")
        .authorization_bearer(&guide.token)
        .json(&json!({ "requestId": request_id, "action": "reject" }))
        .await;
    response.assert_status_ok();

    let body: Value = server
        .get("/api/auth/reset-requests")
        .authorization_bearer(&guide.token)
        .await
        .json();
    assert!(body["requests"].as_array().unwrap().is_empty());

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": tourist.password }))
        .await;
    response.assert_status_ok();
}
