//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached record: key, value, and optional expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// Identity of the entry, mirrored in the store's index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `key` - The key identifying the entry
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL; `None` and zero both mean no expiry
    /// * `now` - Instant the TTL is measured from
    pub fn new(key: K, value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            key,
            value,
            expires_at: deadline(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// An entry expires only once `now` is strictly past its deadline, so an
    /// entry observed at exactly its expiry instant is still live.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Computes the expiry instant for a TTL measured from `now`.
///
/// A zero TTL means "no expiry", same as no TTL at all.
fn deadline(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero())
        .and_then(|ttl| now.checked_add(ttl))
}
