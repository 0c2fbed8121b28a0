//! Thread-safe metrics with atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::types::TierLevel;

use super::snapshot::MetricsSnapshot;

/// Monotonic cache counters plus a running-mean lookup latency.
///
/// Counters use relaxed ordering; exact cross-counter consistency is not
/// required for monitoring. The running mean is a read-modify-write and
/// must be updated by one writer at a time, which the coordinator lock
/// guarantees.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    tier1_hits: AtomicU64,
    tier2_hits: AtomicU64,
    tier3_hits: AtomicU64,
    total_misses: AtomicU64,
    total_queries: AtomicU64,
    /// f64 milliseconds stored as raw bits
    average_response_ms: AtomicU64,
    evictions: AtomicU64,
    promotions: AtomicU64,
    demotions: AtomicU64,
    expirations: AtomicU64,
}

impl MetricsRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit served by `level`.
    pub fn record_hit(&self, level: TierLevel) {
        let counter = match level {
            TierLevel::Hot => &self.tier1_hits,
            TierLevel::Warm => &self.tier2_hits,
            TierLevel::Cold => &self.tier3_hits,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that found nothing.
    pub fn record_miss(&self) {
        self.total_misses.fetch_add(1, Ordering::Relaxed);
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Fold one latency sample into the running mean:
    /// `avg' = avg + (sample - avg) / n`, with `n` the query count.
    ///
    /// Call after the matching `record_hit`/`record_miss`.
    pub fn record_latency(&self, sample: Duration) {
        let n = self.total_queries.load(Ordering::Relaxed).max(1) as f64;
        let sample_ms = sample.as_secs_f64() * 1_000.0;
        let avg = f64::from_bits(self.average_response_ms.load(Ordering::Relaxed));
        let updated = avg + (sample_ms - avg) / n;
        self.average_response_ms
            .store(updated.to_bits(), Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_demotions(&self, count: u64) {
        self.demotions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    /// Mean lookup latency in milliseconds.
    #[must_use]
    pub fn average_response_ms(&self) -> f64 {
        f64::from_bits(self.average_response_ms.load(Ordering::Relaxed))
    }

    /// Reset every counter to zero.
    pub fn reset(&self) {
        for counter in [
            &self.tier1_hits,
            &self.tier2_hits,
            &self.tier3_hits,
            &self.total_misses,
            &self.total_queries,
            &self.evictions,
            &self.promotions,
            &self.demotions,
            &self.expirations,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.average_response_ms
            .store(0f64.to_bits(), Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters. Memory usage is supplied by the
    /// owner since tiers track their own bytes.
    #[must_use]
    pub fn snapshot(&self, memory_usage_bytes: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            tier1_hits: self.tier1_hits.load(Ordering::Relaxed),
            tier2_hits: self.tier2_hits.load(Ordering::Relaxed),
            tier3_hits: self.tier3_hits.load(Ordering::Relaxed),
            total_misses: self.total_misses.load(Ordering::Relaxed),
            total_queries: self.total_queries.load(Ordering::Relaxed),
            average_response_time_ms: self.average_response_ms(),
            memory_usage_bytes,
            evictions: self.evictions.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}
