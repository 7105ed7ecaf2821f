//! LRU KV - A key-value access layer with a bounded in-memory cache
//!
//! Reads go through an LRU cache before reaching the backing table; writes
//! go to the table first and are mirrored into the cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use service::KvService;
