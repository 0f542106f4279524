//! Authentication test helpers
//!
//! Registration and login through the HTTP API, for tests that need a real
//! password hash or a token.

use axum_test::TestServer;
use serde_json::{json, Value};

/// Test user credentials
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Register a user through `/api/auth/register` and return the response body
pub async fn register(server: &TestServer, username: &str, password: &str, role: &str) -> Value {
    server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
            "role": role,
        }))
        .await
        .json()
}

/// Register a tourist and log in, returning the id and token
pub async fn register_and_login(server: &TestServer, username: &str) -> TestUser {
    register_and_login_as(server, username, "tourist").await
}

/// Register with `role` and log in, returning the id and token
pub async fn register_and_login_as(server: &TestServer, username: &str, role: &str) -> TestUser {
    let password = "secret123";
    let registered = register(server, username, password, role).await;
    assert_eq!(registered["success"], true, "registration failed: {}", registered);

    let body: Value = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await
        .json();

    let id = body["user"]["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("login returns the user id as a string");

    TestUser {
        id,
        username: username.to_string(),
        password: password.to_string(),
        token: body["token"].as_str().expect("login returns a token").to_string(),
    }
}
