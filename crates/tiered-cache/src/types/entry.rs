//! Cache entry type: a value plus access metadata.

use std::time::{Duration, Instant};

use crate::config::constants::ENTRY_METADATA_SIZE;

use super::key::CacheKey;
use super::size::MemorySize;

/// Cached value with LRU/promotion metadata.
///
/// Entries are only mutated while their owning tier is locked, so the
/// counters are plain integers.
///
/// # Invariants
/// - `last_accessed >= created_at`
/// - `access_count >= 1`
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key this entry is stored under
    pub key: CacheKey,
    /// The cached value
    pub value: V,
    /// Creation timestamp for TTL expiration
    created_at: Instant,
    /// Last hit (LRU ordering)
    last_accessed: Instant,
    /// Total accesses including the initial set
    access_count: u32,
    /// Hits since the entry entered its current tier
    tier_hits: u32,
    /// Estimated footprint: payload + metadata
    size_bytes: usize,
    /// Lifetime from creation, `None` = never expires
    ttl: Option<Duration>,
}

impl<V: MemorySize> CacheEntry<V> {
    /// Create a fresh entry stamped now. `access_count` starts at 1.
    #[must_use]
    pub fn new(key: CacheKey, value: V, ttl: Option<Duration>) -> Self {
        Self::new_at(key, value, ttl, Instant::now())
    }

    /// Create a fresh entry with an explicit creation instant.
    #[must_use]
    pub fn new_at(key: CacheKey, value: V, ttl: Option<Duration>, now: Instant) -> Self {
        let size_bytes = value.memory_size() + ENTRY_METADATA_SIZE;
        Self {
            key,
            value,
            created_at: now,
            last_accessed: now,
            access_count: 1,
            tier_hits: 0,
            size_bytes,
            ttl,
        }
    }
}

impl<V> CacheEntry<V> {
    /// Record a hit at `now`.
    ///
    /// `last_accessed` never moves backwards, keeping `last_accessed >= created_at`.
    pub fn touch(&mut self, now: Instant) {
        if now > self.last_accessed {
            self.last_accessed = now;
        }
        self.access_count = self.access_count.saturating_add(1);
        self.tier_hits = self.tier_hits.saturating_add(1);
    }

    /// Forget tier-local hits; called when the entry moves between tiers.
    pub fn reset_tier_hits(&mut self) {
        self.tier_hits = 0;
    }

    /// Whether the TTL has elapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.created_at) >= ttl,
            None => false,
        }
    }

    /// Whether the TTL has elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Instant at which the entry expires, if it has a TTL.
    #[must_use]
    pub fn expires_at(&self) -> Option<Instant> {
        self.ttl.map(|ttl| self.created_at + ttl)
    }

    #[must_use]
    pub fn access_count(&self) -> u32 {
        self.access_count
    }

    #[must_use]
    pub fn tier_hits(&self) -> u32 {
        self.tier_hits
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[must_use]
    pub fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Time since creation.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Estimated size in bytes (payload + metadata).
    #[must_use]
    pub fn memory_size(&self) -> usize {
        self.size_bytes
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
