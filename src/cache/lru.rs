//! LRU Cache Module
//!
//! Thread-safe cache handle: one mutex guards the whole store, so the index
//! and the recency list are only ever observed together.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{Cache, CacheInfo, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == LRU Cache ==
/// Fixed-capacity cache with LRU eviction and lazy TTL expiry.
///
/// Every operation, including `get`, reorders recency, so there is no
/// reader/writer split: all calls take the same exclusive lock. Share it
/// between threads with an `Arc`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use lru_ttl::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.add("a", 1);
/// cache.add_with_ttl("b", 2, Duration::from_secs(60));
/// cache.add("c", 3); // evicts "a"
///
/// assert_eq!(cache.get("a"), None);
/// assert_eq!(cache.get("b"), Some(2));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct LruCache<K, V> {
    store: Mutex<CacheStore<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity)
    /// when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        CacheStore::new(capacity).map(Self::from_store)
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        CacheStore::from_config(config).map(Self::from_store)
    }

    fn from_store(store: CacheStore<K, V>) -> Self {
        Self {
            capacity: store.capacity(),
            store: Mutex::new(store),
        }
    }

    /// Configured capacity. Never changes, so no lock is taken.
    pub fn cap(&self) -> usize {
        self.capacity
    }

    /// Live entry count after sweeping expired entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or updates `key` with no expiry. See [`CacheStore::add`].
    pub fn add(&self, key: K, value: V) {
        self.store.lock().add(key, value);
    }

    /// Inserts or updates `key` expiring `ttl` from now; zero means never.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.store.lock().add_with_ttl(key, value, ttl);
    }

    /// Returns a copy of the value and marks the entry most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.lock().get(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains(key)
    }

    /// Removes `key`, returning its value. Missing keys are a no-op.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().remove(key)
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Sweeps expired entries now and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    // == Info ==
    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            capacity: self.capacity,
            len: self.len(),
        }
    }

    // == Snapshot ==
    /// Live entries from most to least recently used.
    ///
    /// Sweeps first; recency order is not changed by reading it.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let mut store = self.store.lock();
        store.purge_expired();
        store
            .entries()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// == Cache Trait Implementation ==
impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn cap(&self) -> usize {
        LruCache::cap(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn clear(&self) {
        LruCache::clear(self);
    }

    fn add(&self, key: K, value: V) {
        LruCache::add(self, key, value);
    }

    fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        LruCache::add_with_ttl(self, key, value, ttl);
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

/// One `[key: value]` line per live entry, most recent first.
impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut store = self.store.lock();
        store.purge_expired();
        for (key, value) in store.entries() {
            writeln!(f, "[{}: {}]", key, value)?;
        }
        Ok(())
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
