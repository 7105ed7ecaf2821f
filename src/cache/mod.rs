//! Cache Module
//!
//! Provides the bounded in-memory cache with LRU eviction.

mod entry;
mod lru;
mod lru_cache;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyIndex;
pub use lru_cache::{InvariantViolation, LruCache};
pub use stats::CacheStats;

// == Public Constants ==
/// Cache capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 5;
