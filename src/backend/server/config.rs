/**
 * Server Configuration
 *
 * This module loads the server configuration from the environment and opens
 * the database described by it.
 *
 * # Configuration Sources
 *
 * Values come from environment variables (a `.env` file is loaded by the
 * binary through `dotenv`), with defaults suitable for local development:
 *
 * | Variable | Default |
 * |---|---|
 * | `DATABASE_URL` | `sqlite://travel_app.db?mode=rwc` |
 * | `SERVER_PORT` | `3000` |
 * | `JWT_SECRET` | development secret (logged as a warning) |
 * | `DB_MAX_CONNECTIONS` | `5` |
 * | `SEED_DEMO_USERS` | `true` |
 */

use std::net::SocketAddr;
use thiserror::Error;

use crate::backend::error::BackendResult;
use crate::backend::store::Database;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://travel_app.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEV_JWT_SECRET: &str = "travelmate-dev-secret-change-me";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// sqlx SQLite connection URL
    pub database_url: String,
    /// TCP port the HTTP server binds on all interfaces
    pub port: u16,
    /// HMAC secret for issued JWTs
    pub jwt_secret: String,
    /// Upper bound of the connection pool
    pub max_connections: u32,
    /// Insert the demo accounts into an empty users table at startup
    pub seed_demo_users: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            seed_demo_users: true,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read the configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a numeric or boolean variable
    /// does not parse. Unset variables fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(url) = lookup("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &port)?);
        }
        match lookup("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse_var("DB_MAX_CONNECTIONS", &max)?);
        }
        if let Some(seed) = lookup("SEED_DEMO_USERS") {
            builder = builder.seed_demo_users(parse_bool("SEED_DEMO_USERS", &seed)?);
        }

        builder.build()
    }

    /// Socket address the server listens on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    jwt_secret: Option<String>,
    max_connections: Option<u32>,
    seed_demo_users: Option<bool>,
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn seed_demo_users(mut self, seed: bool) -> Self {
        self.seed_demo_users = Some(seed);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            port: self.port.unwrap_or(defaults.port),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            seed_demo_users: self.seed_demo_users.unwrap_or(defaults.seed_demo_users),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Open the database named by the configuration and prepare it for serving
///
/// This function:
/// 1. Opens the SQLite pool at `DATABASE_URL`
/// 2. Runs the embedded migrations
/// 3. Seeds the demo accounts when enabled and the users table is empty
///
/// # Errors
///
/// Unlike optional services, the store is required: any failure here aborts
/// startup.
pub async fn load_database(config: &ServerConfig) -> BackendResult<Database> {
    tracing::info!("Connecting to database...");
    let db = Database::open(&config.database_url, config.max_connections).await?;
    tracing::info!("Database ready");

    if config.seed_demo_users {
        let seeded = db.seed_demo_users().await?;
        if seeded > 0 {
            tracing::info!("Seeded {} demo users", seeded);
        }
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert!(config.seed_demo_users);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "8081"),
            ("JWT_SECRET", "s3cret"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("SEED_DEMO_USERS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.listen_addr().port(), 8081);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.max_connections, 2);
        assert!(!config.seed_demo_users);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("SERVER_PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue { name: "SERVER_PORT", value: "http".to_string() }
        );
    }

    #[test]
    fn test_zero_connections_rejected() {
        let result = ServerConfig::builder().max_connections(0).build();
        assert!(result.is_err());
    }
}
