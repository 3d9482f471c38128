//! Memory Store Module
//!
//! In-process backend combining a HashMap with TTL expiration and optional
//! LRU eviction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::store::{LruTracker, Pairs, Store, StoreStats, StoredValue, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Memory Store Error ==
/// Rejections raised by the memory store. A rejected batch is not applied.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("key exceeds maximum length of 256 bytes: {0}")]
    KeyTooLong(String),

    #[error("value for key '{0}' exceeds maximum size of 1 MiB")]
    ValueTooLarge(String),
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, StoredValue>,
    lru: LruTracker,
    stats: StoreStats,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.values.remove(key).is_some()
    }
}

// == Memory Store ==
/// Thread-safe in-memory store.
///
/// Values saved without an expiry fall back to the store's default TTL, if
/// one is configured. When the capacity is reached, the least recently used
/// key is evicted to make room.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// Maximum number of keys held at once
    max_entries: usize,
    /// TTL in seconds applied when a save carries none
    default_ttl: Option<u64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    // == Constructors ==
    /// Creates an unbounded store with no default TTL.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Creates a store holding at most `max_entries` keys (at least one).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries: max_entries.max(1),
            default_ttl: None,
        }
    }

    /// Sets the TTL used for saves without an expiry. Zero disables it.
    pub fn with_default_ttl(mut self, ttl_secs: u64) -> Self {
        self.default_ttl = (ttl_secs > 0).then_some(ttl_secs);
        self
    }

    /// Creates a store from the capacity and default TTL in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.max_entries).with_default_ttl(config.default_ttl)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation leaves the map consistent, so a panic elsewhere
        // never invalidates the data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate(pairs: &Pairs) -> Result<(), MemoryStoreError> {
        for (key, value) in pairs.iter() {
            if key.is_empty() {
                return Err(MemoryStoreError::EmptyKey);
            }
            if key.len() > MAX_KEY_LENGTH {
                return Err(MemoryStoreError::KeyTooLong(key.to_string()));
            }
            if value.len() > MAX_VALUE_SIZE {
                return Err(MemoryStoreError::ValueTooLarge(key.to_string()));
            }
        }
        Ok(())
    }

    // == TTL ==
    /// Remaining lifetime of a live key; None when the key is absent,
    /// expired, or stored without expiry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let inner = self.lock();
        inner
            .values
            .get(key)
            .filter(|value| !value.is_expired())
            .and_then(StoredValue::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes every expired key and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let expired: Vec<String> = inner
            .values
            .iter()
            .filter(|(_, value)| value.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        inner.stats.expirations += expired.len() as u64;
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> StoreStats {
        let inner = self.lock();
        StoreStats {
            total_entries: inner.values.len(),
            ..inner.stats.clone()
        }
    }

    /// Number of keys held, expired ones included until they are purged.
    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    type Error = MemoryStoreError;

    fn save(&self, pairs: Pairs, expire_secs: Option<u64>) -> Result<(), Self::Error> {
        Self::validate(&pairs)?;

        let ttl = expire_secs.filter(|secs| *secs > 0).or(self.default_ttl);
        let mut guard = self.lock();
        let inner = &mut *guard;

        for (key, data) in pairs {
            let is_overwrite = inner.values.contains_key(&key);
            if !is_overwrite && inner.values.len() >= self.max_entries {
                if let Some(evicted) = inner.lru.evict_oldest() {
                    inner.values.remove(&evicted);
                    inner.stats.evictions += 1;
                    debug!(key = %evicted, "evicted least recently used key");
                }
            }

            inner.lru.touch(&key);
            inner.values.insert(key, StoredValue::new(data, ttl));
        }

        Ok(())
    }

    fn get(&self, keys: &[&str]) -> Result<Pairs, Self::Error> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let now = Instant::now();
        let mut found = Pairs::with_capacity(keys.len());

        for key in keys {
            let expired = inner.values.get(*key).map(|value| value.is_expired_at(now));
            match expired {
                None => inner.stats.misses += 1,
                Some(true) => {
                    inner.remove(key);
                    inner.stats.expirations += 1;
                    inner.stats.misses += 1;
                }
                Some(false) => {
                    found.set(*key, inner.values[*key].data.clone());
                    inner.lru.touch(key);
                    inner.stats.hits += 1;
                }
            }
        }

        Ok(found)
    }

    fn delete(&self, keys: &[&str]) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        for key in keys {
            inner.remove(key);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        let inner = self.lock();
        Ok(inner
            .values
            .get(key)
            .is_some_and(|value| !value.is_expired()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn pairs(items: &[(&str, &str)]) -> Pairs {
        items.iter().copied().collect()
    }

    #[test]
    fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_save_and_get() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k1", "v1"), ("k2", "v2")]), None).unwrap();

        let found = store.get(&["k1", "k2"]).unwrap();
        assert_eq!(found.get("k1"), Some(&b"v1"[..]));
        assert_eq!(found.get("k2"), Some(&b"v2"[..]));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_get_omits_missing_keys() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k1", "v1")]), None).unwrap();

        let found = store.get(&["k1", "missing"]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(!found.contains_key("missing"));
    }

    #[test]
    fn test_store_overwrite() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v1")]), None).unwrap();
        store.save(pairs(&[("k", "v2")]), None).unwrap();

        assert_eq!(store.get(&["k"]).unwrap().get("k"), Some(&b"v2"[..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v")]), None).unwrap();

        store.delete(&["k", "never-set"]).unwrap();
        store.delete(&["k"]).unwrap();

        assert!(store.is_empty());
        assert!(!store.exists("k").unwrap());
    }

    #[test]
    fn test_store_exists() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v")]), None).unwrap();

        assert!(store.exists("k").unwrap());
        assert!(!store.exists("other").unwrap());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v")]), Some(1)).unwrap();
        assert!(store.exists("k").unwrap());

        sleep(Duration::from_millis(1100));

        assert!(!store.exists("k").unwrap());
        assert!(store.get(&["k"]).unwrap().is_empty());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_zero_expire_means_no_ttl() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v")]), Some(0)).unwrap();

        assert!(store.exists("k").unwrap());
        assert_eq!(store.ttl("k"), None);
    }

    #[test]
    fn test_store_default_ttl_applies_without_expire() {
        let store = MemoryStore::new().with_default_ttl(300);
        store.save(pairs(&[("default", "v")]), None).unwrap();
        store.save(pairs(&[("explicit", "v")]), Some(10)).unwrap();

        assert!(store.ttl("default").unwrap() > Duration::from_secs(290));
        assert!(store.ttl("explicit").unwrap() <= Duration::from_secs(10));
    }

    #[test]
    fn test_store_lru_eviction() {
        let store = MemoryStore::with_capacity(3);
        store.save(pairs(&[("k1", "v")]), None).unwrap();
        store.save(pairs(&[("k2", "v")]), None).unwrap();
        store.save(pairs(&[("k3", "v")]), None).unwrap();

        // Reading k1 makes k2 the eviction candidate
        store.get(&["k1"]).unwrap();
        store.save(pairs(&[("k4", "v")]), None).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.exists("k1").unwrap());
        assert!(!store.exists("k2").unwrap());
        assert!(store.exists("k4").unwrap());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let store = MemoryStore::with_capacity(2);
        store.save(pairs(&[("k1", "v"), ("k2", "v")]), None).unwrap();
        store.save(pairs(&[("k1", "v2")]), None).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_stats() {
        let store = MemoryStore::new();
        store.save(pairs(&[("k", "v")]), None).unwrap();
        store.get(&["k", "missing"]).unwrap();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let store = MemoryStore::new();
        store.save(pairs(&[("short", "v")]), Some(1)).unwrap();
        store.save(pairs(&[("long", "v")]), Some(10)).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.exists("long").unwrap());
    }

    #[test]
    fn test_store_rejects_long_key_without_partial_write() {
        let store = MemoryStore::new();
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        let batch = pairs(&[("ok", "v"), (long_key.as_str(), "v")]);

        let result = store.save(batch, None);
        assert!(matches!(result, Err(MemoryStoreError::KeyTooLong(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_rejects_large_value() {
        let store = MemoryStore::new();
        let mut batch = Pairs::new();
        batch.set("k", vec![0u8; MAX_VALUE_SIZE + 1]);

        let result = store.save(batch, None);
        assert_eq!(result, Err(MemoryStoreError::ValueTooLarge("k".to_string())));
    }

    #[test]
    fn test_store_rejects_empty_key() {
        let store = MemoryStore::new();
        let result = store.save(pairs(&[("", "v")]), None);
        assert_eq!(result, Err(MemoryStoreError::EmptyKey));
    }
}
