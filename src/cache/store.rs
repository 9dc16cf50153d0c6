//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration and
//! approximate memory accounting.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::entry::CacheEntry;
use crate::cache::stats::{CacheStats, StatsCounters};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_reclaimer, ReclaimerHandle};
use crate::util::{estimated_size, parse_capacity};

// == Store State ==
/// Everything guarded by the store's single reader-writer lock.
#[derive(Debug)]
struct StoreState<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Sum of `tracked_size` over `entries`
    tracked_bytes: u64,
    /// Upper bound checked by `set`; 0 rejects every write
    max_memory: u64,
}

// == Cache Store ==
/// Thread-safe key-value cache with TTL expiration and a soft memory budget.
///
/// Reads treat an entry as absent once its deadline passes, but the entry
/// stays in the map, and keeps counting towards [`size`](Self::size),
/// [`keys`](Self::keys) and tracked bytes, until a sweep removes it.
#[derive(Debug)]
pub struct CacheStore<V> {
    state: RwLock<StoreState<V>>,
    stats: StatsCounters,
}

impl<V> CacheStore<V>
where
    V: Serialize + Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a shared store and starts its background reclaimer.
    ///
    /// The memory limit starts at 0, so every `set` fails until
    /// [`set_max_memory`](Self::set_max_memory) is called. Must be called
    /// from within a Tokio runtime.
    ///
    /// # Arguments
    /// * `reclaim_interval` - Period between expiry sweeps
    pub fn new(reclaim_interval: Duration) -> (Arc<Self>, ReclaimerHandle) {
        let store = Arc::new(Self::standalone());
        let handle = spawn_reclaimer(Arc::clone(&store), reclaim_interval);
        (store, handle)
    }

    /// Creates a shared store from configuration and starts its reclaimer.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `config.max_memory` does not parse.
    pub fn from_config(config: &Config) -> Result<(Arc<Self>, ReclaimerHandle)> {
        let max_memory = parse_capacity(&config.max_memory)?;

        let store = Arc::new(Self::standalone());
        store.state.write().max_memory = max_memory;

        let handle = spawn_reclaimer(Arc::clone(&store), config.reclaim_interval());
        Ok((store, handle))
    }
}

impl<V> CacheStore<V> {
    /// Creates a store without a background reclaimer.
    ///
    /// Expired entries are only physically removed by explicit calls to
    /// [`reclaim_expired`](Self::reclaim_expired), [`del`](Self::del) or
    /// [`flush`](Self::flush).
    pub fn standalone() -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: HashMap::new(),
                tracked_bytes: 0,
                max_memory: 0,
            }),
            stats: StatsCounters::default(),
        }
    }

    // == Set Max Memory ==
    /// Parses a capacity string such as `"10MB"` and installs it as the limit.
    ///
    /// Returns `false`, leaving the previous limit in place, when the string
    /// does not parse. Entries already stored are not re-checked.
    pub fn set_max_memory(&self, size: &str) -> bool {
        match parse_capacity(size) {
            Ok(max_memory) => {
                self.state.write().max_memory = max_memory;
                true
            }
            Err(err) => {
                warn!("Rejected capacity: {}", err);
                false
            }
        }
    }

    /// Returns the configured limit in bytes.
    pub fn max_memory(&self) -> u64 {
        self.state.read().max_memory
    }

    // == Set ==
    /// Stores a value that expires `ttl` from now.
    ///
    /// Overwriting a key replaces its previous size contribution. When the
    /// resulting tracked size would exceed the limit the store is left
    /// untouched, including any entry previously held under `key`.
    ///
    /// # Errors
    /// - `CacheError::EmptyKey` if `key` is empty
    /// - `CacheError::MemoryLimit` if the write does not fit
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()>
    where
        V: Serialize,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let incoming = (key.len() + estimated_size(&value)) as u64;

        let mut state = self.state.write();
        let outgoing = state
            .entries
            .get(&key)
            .map_or(0, |entry| entry.tracked_size);

        let required = state.tracked_bytes - outgoing + incoming;
        if required > state.max_memory {
            let limit = state.max_memory;
            drop(state);

            self.stats.record_rejected_write();
            debug!(
                "Rejected write for {:?}: {} bytes required, limit {}",
                key, required, limit
            );
            return Err(CacheError::MemoryLimit { required, limit });
        }

        state
            .entries
            .insert(key, CacheEntry::new(value, ttl, incoming));
        state.tracked_bytes = required;

        Ok(())
    }

    // == Get ==
    /// Retrieves a clone of the value if the key is present and not expired.
    ///
    /// Expired entries are reported as absent but left in place.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let value = {
            let state = self.state.read();
            state
                .entries
                .get(key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone())
        };

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Delete ==
    /// Removes an entry by key. Absent keys are a no-op.
    pub fn del(&self, key: &str) {
        let mut state = self.state.write();
        if let Some(entry) = state.entries.remove(key) {
            state.tracked_bytes -= entry.tracked_size;
        }
    }

    // == Exists ==
    /// Returns true if the key is present and not expired.
    pub fn exists(&self, key: &str) -> bool {
        self.state
            .read()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == TTL ==
    /// Returns the time left before a live entry expires.
    ///
    /// `None` for absent or expired keys, and for entries whose deadline
    /// overflowed at write time.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.state
            .read()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.ttl_remaining())
    }

    // == Flush ==
    /// Removes every entry and resets tracked bytes to zero.
    pub fn flush(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.tracked_bytes = 0;
    }

    // == Size ==
    /// Returns the number of entries in the map, expired-but-unreclaimed included.
    pub fn size(&self) -> usize {
        self.state.read().entries.len()
    }

    // == Keys ==
    /// Returns every key in the map in unspecified order, expired-but-unreclaimed included.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().entries.keys().cloned().collect()
    }

    /// Returns the approximate bytes attributed to stored keys and values.
    pub fn tracked_bytes(&self) -> u64 {
        self.state.read().tracked_bytes
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        self.stats
            .snapshot(state.entries.len(), state.tracked_bytes, state.max_memory)
    }

    // == Reclaim Expired ==
    /// Removes entries whose deadline has passed.
    ///
    /// Expired keys are collected under the shared lock, then each one is
    /// removed under its own exclusive acquisition. A key overwritten with a
    /// fresh deadline in between is kept.
    ///
    /// Returns the number of entries removed.
    pub fn reclaim_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = {
            let state = self.state.read();
            state
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect()
        };

        let mut removed = 0;
        for key in expired {
            let mut state = self.state.write();
            let still_expired = state
                .entries
                .get(&key)
                .is_some_and(|entry| entry.is_expired_at(now));
            if still_expired {
                if let Some(entry) = state.entries.remove(&key) {
                    state.tracked_bytes -= entry.tracked_size;
                    removed += 1;
                }
            }
        }

        self.stats.record_reclaimed(removed as u64);
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    fn store_with_limit(limit: &str) -> CacheStore<String> {
        let store: CacheStore<String> = CacheStore::standalone();
        assert!(store.set_max_memory(limit));
        store
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::standalone();
        assert_eq!(store.size(), 0);
        assert_eq!(store.tracked_bytes(), 0);
        assert_eq!(store.max_memory(), 0);
    }

    #[test]
    fn test_store_default_limit_rejects_writes() {
        let store: CacheStore<String> = CacheStore::standalone();

        let result = store.set("key1", "value1".to_string(), TTL);
        assert!(matches!(result, Err(CacheError::MemoryLimit { limit: 0, .. })));
        assert_eq!(store.size(), 0);
        assert_eq!(store.tracked_bytes(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), TTL).unwrap();

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.size(), 1);
        // "key1" + "\"value1\""
        assert_eq!(store.tracked_bytes(), 4 + 8);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = store_with_limit("1MB");
        assert!(store.get("nonexistent").is_none());
        assert!(!store.exists("nonexistent"));
    }

    #[test]
    fn test_store_empty_key() {
        let store = store_with_limit("1MB");

        let result = store.set("", "value".to_string(), TTL);
        assert_eq!(result, Err(CacheError::EmptyKey));
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_set_max_memory_invalid_keeps_previous() {
        let store = store_with_limit("1KB");

        assert!(!store.set_max_memory("5"));
        assert!(!store.set_max_memory("-1MB"));
        assert_eq!(store.max_memory(), 1024);

        assert!(store.set_max_memory("2KB"));
        assert_eq!(store.max_memory(), 2048);
    }

    #[test]
    fn test_store_memory_limit_leaves_no_trace() {
        let store = store_with_limit("1B");

        let result = store.set("key1", "val1".to_string(), TTL);
        assert!(matches!(
            result,
            Err(CacheError::MemoryLimit { required: 10, limit: 1 })
        ));
        assert_eq!(store.tracked_bytes(), 0);
        assert!(store.keys().is_empty());
        assert_eq!(store.stats().rejected_writes, 1);
    }

    #[test]
    fn test_store_exact_limit_fits() {
        // "k" + "\"v\"" is 4 bytes
        let store = store_with_limit("4B");

        store.set("k", "v".to_string(), TTL).unwrap();
        assert_eq!(store.tracked_bytes(), 4);

        assert!(store.set("j", "v".to_string(), TTL).is_err());
        assert_eq!(store.tracked_bytes(), 4);
    }

    #[test]
    fn test_store_overwrite_replaces_contribution() {
        let store = store_with_limit("1MB");

        store.set("key1", "a".to_string(), TTL).unwrap();
        assert_eq!(store.tracked_bytes(), 4 + 3);

        store.set("key1", "abcdef".to_string(), TTL).unwrap();
        assert_eq!(store.tracked_bytes(), 4 + 8);
        assert_eq!(store.get("key1").as_deref(), Some("abcdef"));
        assert_eq!(store.size(), 1);

        store.set("key1", "".to_string(), TTL).unwrap();
        assert_eq!(store.tracked_bytes(), 4 + 2);
    }

    #[test]
    fn test_store_overwrite_over_limit_keeps_old_value() {
        // "key1" + "\"aa\"" is 8 bytes
        let store = store_with_limit("10B");

        store.set("key1", "aa".to_string(), TTL).unwrap();
        let result = store.set("key1", "aaaaaaaa".to_string(), TTL);

        assert!(matches!(result, Err(CacheError::MemoryLimit { .. })));
        assert_eq!(store.get("key1").as_deref(), Some("aa"));
        assert_eq!(store.tracked_bytes(), 8);
    }

    #[test]
    fn test_store_overwrite_shrink_fits_when_full() {
        let store = store_with_limit("8B");

        store.set("key1", "aa".to_string(), TTL).unwrap();
        store.set("key1", "a".to_string(), TTL).unwrap();
        assert_eq!(store.tracked_bytes(), 7);
    }

    #[test]
    fn test_store_delete() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), TTL).unwrap();
        store.del("key1");

        assert_eq!(store.size(), 0);
        assert_eq!(store.tracked_bytes(), 0);
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let store = store_with_limit("1MB");
        store.set("key1", "value1".to_string(), TTL).unwrap();
        let before = store.tracked_bytes();

        store.del("nonexistent");

        assert_eq!(store.size(), 1);
        assert_eq!(store.tracked_bytes(), before);
    }

    #[test]
    fn test_store_flush() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), TTL).unwrap();
        store.set("key2", "value2".to_string(), TTL).unwrap();
        store.flush();

        assert_eq!(store.size(), 0);
        assert_eq!(store.tracked_bytes(), 0);
        assert!(store.get("key1").is_none());
        assert!(store.get("key2").is_none());
    }

    #[test]
    fn test_store_keys() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), TTL).unwrap();
        store.set("key2", "value2".to_string(), TTL).unwrap();

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["key1".to_string(), "key2".to_string()]);
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy() {
        let store = store_with_limit("1MB");

        store
            .set("key1", "value1".to_string(), Duration::from_millis(100))
            .unwrap();
        assert!(store.exists("key1"));

        sleep(Duration::from_millis(150));

        // Logically gone, physically still present
        assert!(store.get("key1").is_none());
        assert!(!store.exists("key1"));
        assert_eq!(store.size(), 1);
        assert_eq!(store.keys(), vec!["key1".to_string()]);
        assert_eq!(store.tracked_bytes(), 12);
    }

    #[test]
    fn test_store_ttl_remaining() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), Duration::from_secs(10)).unwrap();

        let remaining = store.ttl("key1").unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
        assert!(store.ttl("missing").is_none());
    }

    #[test]
    fn test_store_reclaim_expired() {
        let store = store_with_limit("1MB");

        store
            .set("key1", "value1".to_string(), Duration::from_millis(100))
            .unwrap();
        store.set("key2", "value2".to_string(), Duration::from_secs(10)).unwrap();

        sleep(Duration::from_millis(150));

        let removed = store.reclaim_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.size(), 1);
        assert_eq!(store.keys(), vec!["key2".to_string()]);
        assert_eq!(store.tracked_bytes(), 12);
        assert_eq!(store.stats().reclaimed, 1);
    }

    #[test]
    fn test_store_stats() {
        let store = store_with_limit("1MB");

        store.set("key1", "value1".to_string(), TTL).unwrap();
        store.get("key1").unwrap();
        let _ = store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.tracked_bytes, 12);
        assert_eq!(stats.max_memory, 1024 * 1024);
    }

    #[test]
    fn test_store_structured_values() {
        #[derive(Debug, Clone, PartialEq, Serialize)]
        struct Session {
            user: String,
            visits: u32,
        }

        let store: CacheStore<Session> = CacheStore::standalone();
        assert!(store.set_max_memory("1KB"));

        let session = Session {
            user: "ada".to_string(),
            visits: 3,
        };
        store.set("s1", session.clone(), TTL).unwrap();

        assert_eq!(store.get("s1"), Some(session));
        // "s1" + {"user":"ada","visits":3}
        assert_eq!(store.tracked_bytes(), 2 + 25);
    }
}
