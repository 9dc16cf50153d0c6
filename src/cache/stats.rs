//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, reclaimed entries and rejected writes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Counters ==
/// Lock-free counters updated from both shared and exclusive lock paths.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    reclaimed: AtomicU64,
    rejected_writes: AtomicU64,
}

impl StatsCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reclaimed(&self, count: u64) {
        self.reclaimed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_rejected_write(&self) {
        self.rejected_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Captures the counters together with the store's current footprint.
    pub fn snapshot(
        &self,
        total_entries: usize,
        tracked_bytes: u64,
        max_memory: u64,
    ) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            reclaimed: self.reclaimed.load(Ordering::Relaxed),
            rejected_writes: self.rejected_writes.load(Ordering::Relaxed),
            total_entries,
            tracked_bytes,
            max_memory,
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by expiry sweeps
    pub reclaimed: u64,
    /// Writes refused by the memory limit
    pub rejected_writes: u64,
    /// Entries in the map, expired-but-unreclaimed included
    pub total_entries: usize,
    /// Approximate bytes attributed to keys and values
    pub tracked_bytes: u64,
    /// Configured capacity in bytes
    pub max_memory: u64,
    /// RFC 3339 timestamp of the snapshot
    pub taken_at: String,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
