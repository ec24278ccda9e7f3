//! Cache Store Module
//!
//! Main cache engine combining a hash index with the recency list, LRU
//! eviction, and the lazy TTL sweep.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::cache::entry::CacheEntry;
use crate::cache::list::RecencyList;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Unsynchronized cache engine with LRU eviction and TTL support.
///
/// Every key in `index` points at the list slot holding that key's entry, and
/// every linked entry has its key in `index`. All mutation goes through methods
/// that update both together.
///
/// Wrap it in [`LruCache`](crate::cache::LruCache) to share it across threads.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to list slot
    index: HashMap<K, usize, RandomState>,
    /// Entries by recency, head = most recent
    list: RecencyList<K, V>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Sweep expired entries before every insert
    sweep_on_add: bool,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(CacheError::InvalidCapacity(config.capacity));
        }
        debug!(
            "Cache store created: capacity={}, sweep_on_add={}",
            config.capacity, config.sweep_on_add
        );

        Ok(Self {
            index: HashMap::with_capacity_and_hasher(config.capacity, RandomState::new()),
            list: RecencyList::with_capacity(config.capacity),
            capacity: config.capacity,
            sweep_on_add: config.sweep_on_add,
        })
    }

    // == Capacity ==
    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Length ==
    /// Returns the number of live entries, sweeping expired ones first.
    ///
    /// # Panics
    /// Panics if the index and the recency list disagree on size, which means
    /// the engine itself is corrupt.
    pub fn len(&mut self) -> usize {
        self.purge_expired();
        assert_eq!(
            self.index.len(),
            self.list.len(),
            "cache index and recency list diverged"
        );
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    // == Add ==
    /// Inserts or updates `key` with no expiry.
    ///
    /// An existing entry keeps its current expiry and becomes most recently
    /// used. A new key at capacity evicts the least recently used entry first.
    pub fn add(&mut self, key: K, value: V) {
        self.upsert(key, value, None);
    }

    // == Add With TTL ==
    /// Inserts or updates `key`, expiring it `ttl` from now.
    ///
    /// A zero `ttl` behaves exactly like [`add`](Self::add).
    pub fn add_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        self.upsert(key, value, Some(ttl));
    }

    fn upsert(&mut self, key: K, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        if self.sweep_on_add {
            self.purge_expired_at(now);
        }

        // Overwrite case
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(idx) {
                entry.value = value;
                if let Some(ttl) = ttl.filter(|ttl| !ttl.is_zero()) {
                    entry.expires_at = now.checked_add(ttl);
                }
            }
            self.list.move_to_front(idx);
            return;
        }

        // Eviction ignores expiry: the tail goes even if something else is stale
        if self.index.len() >= self.capacity {
            self.evict_oldest();
        }

        let idx = self
            .list
            .push_front(CacheEntry::new(key.clone(), value, ttl, now));
        self.index.insert(key, idx);
    }

    // == Get ==
    /// Retrieves a value by key after sweeping expired entries.
    ///
    /// A hit marks the entry as most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.purge_expired();

        let idx = *self.index.get(key)?;
        self.list.move_to_front(idx);
        self.list.get(idx).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Reports whether `key` is live without changing its recency.
    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.purge_expired();
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.remove(idx).map(|entry| entry.value)
    }

    // == Clear ==
    /// Drops every entry; capacity is unchanged.
    pub fn clear(&mut self) {
        let dropped = self.index.len();
        self.index.clear();
        self.list.clear();
        debug!("Cache cleared: dropped {} entries", dropped);
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Sweeps from the tail toward the head against a single instant.
    ///
    /// Expiry is independent of recency, so the walk visits every entry rather
    /// than stopping at the first live one.
    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        let mut cursor = self.list.tail();

        while let Some(idx) = cursor {
            cursor = self.list.prev(idx);

            let expired = self
                .list
                .get(idx)
                .is_some_and(|entry| entry.is_expired_at(now));
            if expired {
                if let Some(entry) = self.list.remove(idx) {
                    self.index.remove(&entry.key);
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            debug!("TTL sweep: removed {} expired entries", removed);
        }
        removed
    }

    fn evict_oldest(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            trace!("Evicted least recently used entry");
        }
    }

    // == Entries ==
    /// Iterates entries from most to least recently used.
    ///
    /// Does not sweep; call [`purge_expired`](Self::purge_expired) first to
    /// skip stale entries.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Verifies the index and the recency list mirror each other exactly.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.list.len() <= self.capacity);

        let mut walked = 0;
        for (idx, entry) in self.list.iter() {
            assert_eq!(self.index.get(&entry.key), Some(&idx));
            walked += 1;
        }
        assert_eq!(walked, self.index.len());
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn keys(store: &CacheStore<&'static str, i32>) -> Vec<&'static str> {
        store.entries().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_store_new() {
        let mut store: CacheStore<&str, i32> = CacheStore::new(100).unwrap();
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result: Result<CacheStore<&str, i32>> = CacheStore::new(0);
        assert_eq!(result.unwrap_err(), CacheError::InvalidCapacity(0));
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = CacheStore::new(100).unwrap();

        store.add("key1", 1);
        assert_eq!(store.get("key1"), Some(&1));
        assert_eq!(store.len(), 1);
        store.assert_invariants();
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<&str, i32> = CacheStore::new(100).unwrap();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_get_with_borrowed_key() {
        let mut store: CacheStore<String, i32> = CacheStore::new(4).unwrap();

        store.add("owned".to_string(), 1);
        assert_eq!(store.get("owned"), Some(&1));
        assert_eq!(store.remove("owned"), Some(1));
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new(100).unwrap();

        store.add("key1", 1);
        assert_eq!(store.remove("key1"), Some(1));
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        store.assert_invariants();
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store = CacheStore::new(100).unwrap();
        store.add("key1", 1);

        assert_eq!(store.remove("nonexistent"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100).unwrap();

        store.add("key1", 1);
        store.add("key1", 2);

        assert_eq!(store.get("key1"), Some(&2));
        assert_eq!(store.len(), 1);
        store.assert_invariants();
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3).unwrap();

        store.add("a", 1);
        store.add("b", 2);
        store.add("c", 3);
        store.add("b", 22);
        store.add("d", 4);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(&22));
        assert_eq!(store.get("c"), Some(&3));
        assert_eq!(store.get("d"), Some(&4));
        store.assert_invariants();
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3).unwrap();

        store.add("a", 1);
        store.add("b", 2);
        store.add("c", 3);

        // Access a to make it most recently used
        store.get("a");
        store.add("d", 4);

        assert_eq!(keys(&store), vec!["d", "a", "c"]);
    }

    #[test]
    fn test_store_contains_does_not_touch() {
        let mut store = CacheStore::new(2).unwrap();

        store.add("a", 1);
        store.add("b", 2);
        assert!(store.contains("a"));
        store.add("c", 3);

        assert!(!store.contains("a"));
        assert_eq!(keys(&store), vec!["c", "b"]);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(3).unwrap();

        store.add_with_ttl("x", 1, Duration::from_millis(50));
        store.add("y", 2);
        store.add("z", 3);
        assert_eq!(store.get("x"), Some(&1));

        sleep(Duration::from_millis(120));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("x"), None);
        store.assert_invariants();
    }

    #[test]
    fn test_store_zero_ttl_means_no_expiry() {
        let mut store = CacheStore::new(3).unwrap();

        store.add_with_ttl("key", 1, Duration::ZERO);
        sleep(Duration::from_millis(20));

        assert_eq!(store.get("key"), Some(&1));
    }

    #[test]
    fn test_store_add_keeps_existing_expiry() {
        let mut store = CacheStore::new(3).unwrap();

        store.add_with_ttl("key", 1, Duration::from_millis(50));
        store.add("key", 2);
        store.add_with_ttl("key", 3, Duration::ZERO);

        sleep(Duration::from_millis(120));
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_store_ttl_refresh_extends_expiry() {
        let mut store = CacheStore::new(3).unwrap();

        store.add_with_ttl("key", 1, Duration::from_millis(50));
        store.add_with_ttl("key", 2, Duration::from_secs(60));

        sleep(Duration::from_millis(120));
        assert_eq!(store.get("key"), Some(&2));
    }

    #[test]
    fn test_store_sweep_continues_past_live_entries() {
        let mut store = CacheStore::new(5).unwrap();

        // Expired entries at head and tail, live ones in between
        store.add_with_ttl("old", 1, Duration::from_millis(30));
        store.add("live1", 2);
        store.add_with_ttl("mid", 3, Duration::from_millis(30));
        store.add("live2", 4);
        store.add_with_ttl("new", 5, Duration::from_millis(30));

        sleep(Duration::from_millis(100));

        assert_eq!(store.purge_expired(), 3);
        assert_eq!(keys(&store), vec!["live2", "live1"]);
        store.assert_invariants();
    }

    #[test]
    fn test_store_eviction_ignores_expiry() {
        let mut store = CacheStore::new(2).unwrap();

        store.add("a", 1);
        store.add_with_ttl("b", 2, Duration::from_millis(10));
        sleep(Duration::from_millis(50));

        // b is expired but a is the tail, so a is evicted
        store.add("c", 3);

        assert_eq!(keys(&store), vec!["c", "b"]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("c"), Some(&3));
    }

    #[test]
    fn test_store_sweep_on_add_reclaims_expired_first() {
        let config = CacheConfig {
            capacity: 2,
            sweep_on_add: true,
        };
        let mut store = CacheStore::from_config(&config).unwrap();

        store.add("a", 1);
        store.add_with_ttl("b", 2, Duration::from_millis(10));
        sleep(Duration::from_millis(50));

        // Sweep frees b's slot, so a survives
        store.add("c", 3);

        assert_eq!(keys(&store), vec!["c", "a"]);
        store.assert_invariants();
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(3).unwrap();

        store.add("a", 1);
        store.add("b", 2);
        store.clear();

        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 3);

        // Reusable after clear
        store.add("c", 3);
        assert_eq!(store.get("c"), Some(&3));
        store.assert_invariants();
    }
}
