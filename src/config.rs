//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::retry::RetryPolicy;

// == Defaults ==
const DEFAULT_POSTGRES_HOST: &str = "db";
const DEFAULT_POSTGRES_USER: &str = "postgres";
const DEFAULT_POSTGRES_PASSWORD: &str = "postgres";
const DEFAULT_POSTGRES_DB: &str = "postgres";
const DEFAULT_REDIS_HOST: &str = "redis";

// == Fixed Constants ==
/// Redis port, not configurable
pub const REDIS_PORT: u16 = 6379;
/// Connect (and, for Redis, response) timeout of both dependencies
pub const DEPENDENCY_TIMEOUT: Duration = Duration::from_secs(5);
/// Lifetime of the cached task list in seconds
pub const CACHE_TTL_SECS: u64 = 30;
/// HTTP listen port
pub const SERVER_PORT: u16 = 5000;

/// Service configuration.
///
/// Built once at startup and handed to the components that need it.
/// Only the PostgreSQL and Redis locations come from the environment; the
/// remaining fields carry fixed values.
#[derive(Clone)]
pub struct Config {
    pub postgres_host: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,
    pub redis_host: String,
    pub redis_port: u16,
    /// Applies to the database connect and to every Redis connect/command
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub cache_ttl_secs: u64,
    pub bind_address: IpAddr,
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POSTGRES_HOST` - Database host (default: db)
    /// - `POSTGRES_USER` - Database user (default: postgres)
    /// - `POSTGRES_PASSWORD` - Database password (default: postgres)
    /// - `POSTGRES_DB` - Database name (default: postgres)
    /// - `REDIS_HOST` - Redis host (default: redis)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Self {
            postgres_host: var_or("POSTGRES_HOST", DEFAULT_POSTGRES_HOST),
            postgres_user: var_or("POSTGRES_USER", DEFAULT_POSTGRES_USER),
            postgres_password: var_or("POSTGRES_PASSWORD", DEFAULT_POSTGRES_PASSWORD),
            postgres_db: var_or("POSTGRES_DB", DEFAULT_POSTGRES_DB),
            redis_host: var_or("REDIS_HOST", DEFAULT_REDIS_HOST),
            ..Self::default()
        }
    }

    /// Connection options for the per-request PostgreSQL connection.
    pub fn pg_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.postgres_host)
            .username(&self.postgres_user)
            .password(&self.postgres_password)
            .database(&self.postgres_db)
    }

    /// Redis URL for the configured host, fixed port and database 0.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/0", self.redis_host, self.redis_port)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            postgres_host: DEFAULT_POSTGRES_HOST.to_string(),
            postgres_user: DEFAULT_POSTGRES_USER.to_string(),
            postgres_password: DEFAULT_POSTGRES_PASSWORD.to_string(),
            postgres_db: DEFAULT_POSTGRES_DB.to_string(),
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            redis_port: REDIS_PORT,
            timeout: DEPENDENCY_TIMEOUT,
            retry: RetryPolicy::default(),
            cache_ttl_secs: CACHE_TTL_SECS,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            server_port: SERVER_PORT,
        }
    }
}

// Password stays out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("postgres_host", &self.postgres_host)
            .field("postgres_user", &self.postgres_user)
            .field("postgres_password", &"***")
            .field("postgres_db", &self.postgres_db)
            .field("redis_host", &self.redis_host)
            .field("redis_port", &self.redis_port)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("bind_address", &self.bind_address)
            .field("server_port", &self.server_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.postgres_host, "db");
        assert_eq!(config.postgres_user, "postgres");
        assert_eq!(config.postgres_password, "postgres");
        assert_eq!(config.postgres_db, "postgres");
        assert_eq!(config.redis_host, "redis");
        assert_eq!(config.redis_port, 6379);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry, RetryPolicy::new(5, Duration::from_secs(1)));
        assert_eq!(config.cache_ttl_secs, 30);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.postgres_host, "db");
        assert_eq!(config.redis_host, "redis");
        assert_eq!(config.redis_url(), "redis://redis:6379/0");
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("POSTGRES_HOST", "pg.internal"),
            ("POSTGRES_USER", "app"),
            ("POSTGRES_PASSWORD", "s3cret"),
            ("POSTGRES_DB", "board"),
            ("REDIS_HOST", "cache.internal"),
        ]);

        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.postgres_host, "pg.internal");
        assert_eq!(config.postgres_user, "app");
        assert_eq!(config.postgres_password, "s3cret");
        assert_eq!(config.postgres_db, "board");
        assert_eq!(config.redis_url(), "redis://cache.internal:6379/0");
        // Fixed constants are not read from the environment
        assert_eq!(config.server_port, 5000);
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = Config::from_lookup(|name| {
            (name == "POSTGRES_PASSWORD").then(|| "hunter2".to_string())
        });
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }
}
