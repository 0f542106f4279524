//! Persistent Store
//!
//! `Database` owns the SQLite connection pool. It is opened once at startup,
//! handed to the HTTP layer through `AppState`, and closed at shutdown.
//!
//! The data-access functions live next to the features that use them
//! (`auth::users`, `messaging::db`, `guide::db`) and take `&SqlitePool` or a
//! `&mut SqliteConnection` when they run inside a caller's transaction.

use std::str::FromStr;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::backend::error::BackendResult;

/// Current time as stored in every timestamp column
///
/// RFC 3339 UTC with microseconds and a `Z` suffix, so lexical order equals
/// chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Timestamp `days` days before now, in the stored format
pub fn days_ago_timestamp(days: i64) -> String {
    (Utc::now() - chrono::Duration::days(days)).to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Timestamp `hours` hours after now, in the stored format
pub fn hours_from_now_timestamp(hours: i64) -> String {
    (Utc::now() + chrono::Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// How long a connection waits for another writer to finish
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a transaction that holds the write lock from its first statement
///
/// Every read-then-write transaction goes through here. A deferred `BEGIN`
/// cannot upgrade its read snapshot while another connection writes and
/// fails with `SQLITE_BUSY` without waiting; `BEGIN IMMEDIATE` queues on the
/// busy timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> BackendResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Demo accounts inserted into an empty database: (username, email, role)
const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin@travelmate.local", "guide"),
    ("user", "user@travelmate.local", "tourist"),
    ("guide1", "guide1@travelmate.local", "guide"),
];
const DEMO_PASSWORD: &str = "123456";

/// Handle to the application database
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url` and run migrations
    ///
    /// File databases use WAL journaling; foreign keys are enforced on every
    /// connection.
    pub async fn open(url: &str, max_connections: u32) -> BackendResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::info!("Database connection pool created ({} max connections)", max_connections);
        Self::from_pool(pool).await
    }

    /// Open a private in-memory database with the full schema
    ///
    /// A single connection that never expires, since every new connection to
    /// `sqlite::memory:` would see an empty database.
    pub async fn open_in_memory() -> BackendResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> BackendResult<Self> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations completed successfully");
        Ok(Self { pool })
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> BackendResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection; further queries fail
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Insert the demo accounts if no user exists yet
    ///
    /// # Returns
    ///
    /// Number of accounts inserted (0 when the table was not empty)
    pub async fn seed_demo_users(&self) -> BackendResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)?;
        let now = now_timestamp();
        let mut inserted = 0;
        for &(username, email, role) in DEMO_USERS {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO users (username, email, password_hash, role, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(username)
            .bind(email)
            .bind(&password_hash)
            .bind(role)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected() as usize;
        }

        Ok(inserted)
    }
}
