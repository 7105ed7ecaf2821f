//! Response DTOs for the key-value API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};
use crate::service::{ReadOutcome, ValueSource, WriteOutcome};

/// Response body for GET /read
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    /// The requested key
    pub key: i64,
    /// The stored value
    pub value: String,
    /// Whether the cache or the store answered
    pub source: ValueSource,
    /// Tagged rendering, e.g. `cache:abc`
    pub result: String,
}

impl From<ReadOutcome> for ReadResponse {
    fn from(outcome: ReadOutcome) -> Self {
        Self {
            result: outcome.to_string(),
            key: outcome.key,
            value: outcome.value,
            source: outcome.source,
        }
    }
}

/// Response body for create, update and delete
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// `created`, `updated` or `deleted`
    pub status: WriteOutcome,
    /// The key that was written
    pub key: i64,
}

impl WriteResponse {
    pub fn new(status: WriteOutcome, key: i64) -> Self {
        Self { status, key }
    }
}

/// Response body for GET /print
#[derive(Debug, Clone, Serialize)]
pub struct DumpResponse {
    /// Configured cache capacity
    pub capacity: usize,
    /// Cached entries, most recently used first
    pub entries: Vec<CacheEntry>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads answered by the cache
    pub hits: u64,
    /// Reads that fell through to the store
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured cache capacity
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Backing store in use
    pub store: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(store: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            store: store.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
