//! Messaging Module
//!
//! Friend requests, symmetric friend edges, private chat sessions and
//! messages with read state and soft delete.
//!
//! - **`db`** - SQLite queries, transactional where several rows change together
//! - **`handlers`** - axum handlers mounted under `/api`

pub mod db;
pub mod handlers;
