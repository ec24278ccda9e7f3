//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and lazy TTL expiry.

mod entry;
mod info;
mod list;
mod lru;
mod store;


use std::time::Duration;

// Re-export public types
pub use info::CacheInfo;
pub use lru::LruCache;
pub use store::CacheStore;

// == Cache Trait ==
/// Capability set shared by cache implementations.
///
/// Implementations keep at most [`cap`](Cache::cap) entries, evict the least
/// recently used one when a new key arrives at capacity, and treat entries past
/// their TTL as absent. Missing keys are never errors.
pub trait Cache<K, V> {
    /// Configured capacity.
    fn cap(&self) -> usize;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry, keeping capacity.
    fn clear(&self);

    /// Inserts or updates `key` with no expiry.
    fn add(&self, key: K, value: V);

    /// Inserts or updates `key`, expiring `ttl` from now. Zero means never.
    fn add_with_ttl(&self, key: K, value: V, ttl: Duration);

    /// Looks up `key`, marking it most recently used on a hit.
    fn get(&self, key: &K) -> Option<V>;

    /// Removes `key` if present.
    fn remove(&self, key: &K) -> Option<V>;
}
