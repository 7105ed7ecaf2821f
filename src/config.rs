//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;

/// Which backing store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Backing store implementation
    pub store_backend: StoreBackend,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries, must be positive (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 5078)
    /// - `DATABASE_PATH` - SQLite database file (default: kv_store.db)
    /// - `STORE_BACKEND` - `sqlite` or `memory` (default: sqlite)
    /// - `STORE_TIMEOUT_MS` - Store call timeout in milliseconds (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_capacity: parse_var("CACHE_CAPACITY")
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(defaults.cache_capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            database_path: env::var("DATABASE_PATH")
                .ok()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            store_timeout: parse_var("STORE_TIMEOUT_MS")
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            server_port: 5078,
            database_path: PathBuf::from("kv_store.db"),
            store_backend: StoreBackend::Sqlite,
            store_timeout: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 5);
        assert_eq!(config.server_port, 5078);
        assert_eq!(config.database_path, PathBuf::from("kv_store.db"));
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.store_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("SERVER_PORT");
        env::remove_var("DATABASE_PATH");
        env::set_var("CACHE_CAPACITY", "0");
        env::set_var("STORE_BACKEND", "Memory");
        env::set_var("STORE_TIMEOUT_MS", "250");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 5);
        assert_eq!(config.server_port, 5078);
        assert_eq!(config.database_path, PathBuf::from("kv_store.db"));
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.store_timeout, Duration::from_millis(250));

        env::set_var("CACHE_CAPACITY", "12");
        env::set_var("STORE_BACKEND", "postgres");
        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 12);
        assert_eq!(config.store_backend, StoreBackend::Sqlite);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("STORE_BACKEND");
        env::remove_var("STORE_TIMEOUT_MS");
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("sqlite".parse::<StoreBackend>(), Ok(StoreBackend::Sqlite));
        assert_eq!(" MEMORY ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
