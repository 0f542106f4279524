//! Messaging API integration tests
//!
//! Friend requests, chats and messages driven through the axum router.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::TestDatabase;
use travelmate::shared::UserRole;

#[tokio::test]
async fn test_friend_request_to_unread_scenario() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let bob = db.create_test_user("bob", UserRole::Tourist).await;
    let server = db.server();

    // Alice asks Bob
    let response = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice, "toId": bob }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    // Bob sees exactly one pending request from Alice
    let body: Value = server
        .get("/api/friends/requests")
        .add_query_param("userId", bob)
        .await
        .json();
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["status"], "pending");
    assert_eq!(requests[0]["fromId"], alice);
    assert_eq!(requests[0]["fromUser"]["username"], "alice");
    let request_id = requests[0]["id"].as_i64().unwrap();

    // Bob accepts, which creates the private chat
    let body: Value = server
        .post("/api/friends/accept")
        .json(&json!({ "requestId": request_id }))
        .await
        .json();
    assert_eq!(body["success"], true);
    assert_eq!(body["isNew"], true);
    let chat_id = body["chatId"].as_i64().unwrap();

    // Alice says hello
    let response = server
        .post("/api/messages/send")
        .json(&json!({
            "chatId": chat_id,
            "from": alice,
            "to": bob,
            "type": "text",
            "content": "hello"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["status"], "sent");
    assert_eq!(body["message"]["from"]["username"], "alice");

    let body: Value = server
        .get("/api/messages/unread")
        .add_query_param("userId", bob)
        .await
        .json();
    assert_eq!(body["unreadCount"], 1);

    // Bob opens the chat
    let body: Value = server
        .get("/api/messages")
        .add_query_param("chatId", chat_id)
        .add_query_param("userId", bob)
        .await
        .json();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hello");

    let body: Value = server
        .get("/api/messages/unread")
        .add_query_param("userId", bob)
        .await
        .json();
    assert_eq!(body["unreadCount"], 0);

    // A later listing shows the message as read
    let body: Value = server
        .get("/api/messages")
        .add_query_param("chatId", chat_id)
        .await
        .json();
    assert_eq!(body["messages"][0]["status"], "read");
}

#[tokio::test]
async fn test_duplicate_request_and_already_friends() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let bob = db.create_test_user("bob", UserRole::Tourist).await;
    let server = db.server();

    server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice, "toId": bob }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice.to_string(), "toId": bob.to_string() }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT);

    let (pending,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM friend_requests WHERE status = 'pending'")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(pending, 1);

    server
        .post("/api/friends/add")
        .json(&json!({ "userId": bob, "friendId": alice }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": bob, "toId": alice }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT, "friends");
}

#[tokio::test]
async fn test_accept_twice_keeps_single_edges() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let bob = db.create_test_user("bob", UserRole::Tourist).await;
    let server = db.server();

    let body: Value = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice, "toId": bob }))
        .await
        .json();
    let request_id = body["requestId"].as_i64().unwrap();

    let first: Value = server
        .post("/api/friends/accept")
        .json(&json!({ "requestId": request_id }))
        .await
        .json();
    let second: Value = server
        .post("/api/friends/accept")
        .json(&json!({ "requestId": request_id }))
        .await
        .json();
    assert_eq!(first["chatId"], second["chatId"]);
    assert_eq!(second["isNew"], false);

    let (edges,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM friends")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(edges, 2);

    // Both directions find the chat created by the acceptance
    for (a, b) in [(alice, bob), (bob, alice)] {
        let body: Value = server
            .post("/api/chats/private")
            .json(&json!({ "userId1": a, "userId2": b }))
            .await
            .json();
        assert_eq!(body["chatId"], first["chatId"]);
        assert_eq!(body["isNew"], false);
    }

    let body: Value = server
        .get("/api/friends")
        .add_query_param("userId", bob)
        .await
        .json();
    assert_eq!(body["friends"].as_array().unwrap().len(), 1);
    assert_eq!(body["friends"][0]["username"], "alice");

    // Rejecting an accepted request is refused
    let response = server
        .post("/api/friends/reject")
        .json(&json!({ "requestId": request_id }))
        .await;
    assert_error_response!(response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_soft_delete_over_http() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let bob = db.create_test_user("bob", UserRole::Tourist).await;
    let server = db.server();

    let body: Value = server
        .post("/api/chats/private")
        .json(&json!({ "userId1": alice, "userId2": bob }))
        .await
        .json();
    let chat_id = body["chatId"].as_i64().unwrap();

    let body: Value = server
        .post("/api/messages/send")
        .json(&json!({
            "chatId": chat_id,
            "from": alice,
            "to": bob,
            "type": "image",
            "imageUrl": "/uploads/view.jpg"
        }))
        .await
        .json();
    let message_id = body["message"]["id"].as_i64().unwrap();

    let response = server
        .delete(&format!("/api/messages/{}", message_id))
        .add_query_param("userId", bob)
        .await;
    assert_error_response!(response, StatusCode::FORBIDDEN);

    server
        .delete(&format!("/api/messages/{}", message_id))
        .add_query_param("userId", alice)
        .await
        .assert_status_ok();

    let body: Value = server
        .get("/api/messages")
        .add_query_param("chatId", chat_id)
        .await
        .json();
    assert!(body["messages"].as_array().unwrap().is_empty());

    let body: Value = server
        .get(&format!("/api/messages/{}", message_id))
        .await
        .json();
    assert_eq!(body["message"]["isDeleted"], true);
    assert_eq!(body["message"]["imageUrl"], "/uploads/view.jpg");

    let response = server.get("/api/messages/9999").await;
    assert_error_response!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_list_and_mark_read() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let bob = db.create_test_user("bob", UserRole::Tourist).await;
    let carol = db.create_test_user("carol", UserRole::Guide).await;
    let server = db.server();

    let mut chat_ids = Vec::new();
    for other in [bob, carol] {
        let body: Value = server
            .post("/api/chats/private")
            .json(&json!({ "userId1": other, "userId2": alice }))
            .await
            .json();
        let chat_id = body["chatId"].as_i64().unwrap();
        server
            .post("/api/messages/send")
            .json(&json!({
                "chatId": chat_id,
                "from": other,
                "to": alice,
                "type": "text",
                "content": "hi alice"
            }))
            .await
            .assert_status_ok();
        chat_ids.push(chat_id);
    }

    let body: Value = server
        .get("/api/chats")
        .add_query_param("userId", alice)
        .await
        .json();
    let chats = body["chats"].as_array().unwrap();
    assert_eq!(chats.len(), 2);
    // Most recent activity first
    assert_eq!(chats[0]["id"], chat_ids[1]);
    assert_eq!(chats[0]["participants"][0]["username"], "carol");
    assert_eq!(chats[0]["lastMsg"], "hi alice");
    assert_eq!(chats[0]["unreadCount"], 1);

    let body: Value = server
        .post("/api/messages/read")
        .json(&json!({ "chatId": chat_ids[0], "userId": alice }))
        .await
        .json();
    assert_eq!(body["updated"], 1);

    let body: Value = server
        .get("/api/messages/unread")
        .add_query_param("userId", alice)
        .await
        .json();
    assert_eq!(body["unreadCount"], 1);
}

#[tokio::test]
async fn test_validation_errors() {
    let db = TestDatabase::new().await;
    let alice = db.create_test_user("alice", UserRole::Tourist).await;
    let server = db.server();

    let response = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "toId");

    let response = server
        .post("/api/friends/request")
        .json(&json!({ "fromId": alice, "toId": alice }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/messages/send")
        .json(&json!({ "chatId": 1, "from": alice, "to": alice, "type": "video" }))
        .await;
    assert_error_response!(response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/messages/send")
        .json(&json!({ "chatId": 42, "from": alice, "to": alice, "type": "text", "content": "x" }))
        .await;
    assert_error_response!(response, StatusCode::NOT_FOUND, "Chat");

    let response = server.post("/api/friends/accept").json(&json!({ "requestId": 77 })).await;
    assert_error_response!(response, StatusCode::NOT_FOUND);

    let response = server.get("/api/chats").await;
    assert_error_response!(response, StatusCode::BAD_REQUEST, "userId");
}
