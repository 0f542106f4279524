//! Database test fixtures and utilities
//!
//! Every fixture owns a private in-memory SQLite database with the full
//! schema, so tests never share state and need no cleanup.

use axum_test::TestServer;
use sqlx::SqlitePool;
use travelmate::backend::auth::users::{create_user, NewUser};
use travelmate::backend::server::{build_app, ServerConfig};
use travelmate::backend::store::Database;
use travelmate::shared::UserRole;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Configuration used by test servers
pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret(TEST_JWT_SECRET)
        .seed_demo_users(false)
        .build()
        .expect("test configuration is valid")
}

/// Test database fixture
pub struct TestDatabase {
    db: Database,
}

impl TestDatabase {
    /// Create a new migrated in-memory database
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to open in-memory database");
        Self { db }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn database(&self) -> Database {
        self.db.clone()
    }

    /// Axum test server over this database
    pub fn server(&self) -> TestServer {
        TestServer::new(build_app(self.database(), test_config()))
            .expect("Failed to create test server")
    }

    /// Insert a user directly, bypassing registration
    ///
    /// The password hash is not a bcrypt hash, so these users cannot log in.
    pub async fn create_test_user(&self, username: &str, role: UserRole) -> i64 {
        create_user(
            self.pool(),
            NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "not-a-real-hash".to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create test user")
        .id
    }
}
