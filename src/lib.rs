//! lru_ttl - A fixed-capacity in-memory cache
//!
//! Keeps the most recently used entries resident, evicting the least recently
//! used one at capacity. Entries may carry a TTL; expired entries are purged
//! lazily by the operations that inspect the cache, never by a background task.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheInfo, CacheStore, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
