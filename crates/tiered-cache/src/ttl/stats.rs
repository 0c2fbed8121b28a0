//! Thread-safe single-tier cache statistics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for [`super::TtlCache`].
///
/// Relaxed ordering throughout; exact consistency is not required for
/// statistical monitoring.
#[derive(Debug, Default)]
pub struct TtlCacheStats {
    /// Live entries returned by `get`.
    pub hits: AtomicU64,
    /// `get` calls that found nothing live.
    pub misses: AtomicU64,
    /// LRU victims of the entry bound or byte budget.
    pub evictions: AtomicU64,
    /// Number of entries removed because their TTL elapsed.
    pub expirations: AtomicU64,
    /// Estimated bytes across live entries.
    pub bytes_used: AtomicUsize,
}

/// Plain copy of [`TtlCacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlCacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub bytes_used: usize,
    pub entries: usize,
}

impl TtlCacheStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
        self.bytes_used.store(0, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_bytes(&self, bytes: usize) {
        self.bytes_used.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Saturates at zero instead of wrapping.
    pub fn subtract_bytes(&self, bytes: usize) {
        let _ = self
            .bytes_used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(bytes))
            });
    }

    /// hits / (hits + misses), 0 when nothing was looked up.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    #[must_use]
    pub fn snapshot(&self, entries: usize) -> TtlCacheStatsSnapshot {
        TtlCacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            bytes_used: self.bytes_used.load(Ordering::Relaxed),
            entries,
        }
    }
}
