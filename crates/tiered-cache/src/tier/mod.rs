//! A single storage level with a fixed capacity and LRU eviction.
//!
//! # Architecture
//!
//! - `HashMap` keyed by [`CacheKey`] gives O(1) lookup
//! - A `BTreeMap` recency index ordered by `(last_accessed, insertion sequence)`
//!   gives O(log n) touch and eviction of the least recently used entry
//! - Ties on `last_accessed` are broken by insertion order into this tier
//!
//! A `Tier` is not synchronized; the owner serializes access.


use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::{debug, error};

use crate::types::{CacheEntry, CacheKey, TierLevel};

type RecencyKey = (Instant, u64);

#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    sequence: u64,
}

impl<V> Slot<V> {
    fn recency_key(&self) -> RecencyKey {
        (self.entry.last_accessed(), self.sequence)
    }
}

/// Result of a [`Tier::get`].
#[derive(Debug)]
pub enum Lookup<'a, V> {
    /// Present and live; access metadata already updated.
    Hit(&'a mut CacheEntry<V>),
    /// Present but past its TTL; it has been removed.
    Expired,
    /// Not present.
    Miss,
}

/// Bounded keyed store of [`CacheEntry`] values with LRU eviction.
///
/// # Invariants
/// - `len() <= capacity()` after every completed operation
/// - every stored entry has exactly one recency index record
#[derive(Debug)]
pub struct Tier<V> {
    level: TierLevel,
    capacity: usize,
    entries: HashMap<CacheKey, Slot<V>>,
    recency: BTreeMap<RecencyKey, CacheKey>,
    next_sequence: u64,
    bytes_used: usize,
}

impl<V> Tier<V> {
    /// Create an empty tier. A zero capacity is clamped to 1.
    #[must_use]
    pub fn new(level: TierLevel, capacity: usize) -> Self {
        if capacity == 0 {
            error!(tier = %level, "Tier capacity 0 is invalid, clamping to 1");
        }
        let capacity = capacity.max(1);
        Self {
            level,
            capacity,
            entries: HashMap::with_capacity(capacity.min(4096)),
            recency: BTreeMap::new(),
            next_sequence: 0,
            bytes_used: 0,
        }
    }

    /// Insert or overwrite, then evict least recently used entries until
    /// the tier is within capacity.
    ///
    /// Returns the evicted entries, oldest first, so the caller can demote
    /// them. The inserted entry itself may be among them when it is the
    /// least recently used.
    pub fn put(&mut self, entry: CacheEntry<V>) -> Vec<CacheEntry<V>> {
        let key = entry.key;
        self.remove(&key);

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.bytes_used += entry.memory_size();
        let slot = Slot { entry, sequence };
        self.recency.insert(slot.recency_key(), key);
        self.entries.insert(key, slot);

        self.enforce_capacity()
    }

    /// Look up a live entry and record the hit.
    ///
    /// An expired entry is removed and reported as [`Lookup::Expired`].
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Lookup<'_, V> {
        let expired = match self.entries.get(key) {
            None => return Lookup::Miss,
            Some(slot) => slot.entry.is_expired_at(now),
        };

        if expired {
            self.remove(key);
            debug!(tier = %self.level, key = %key, "Lazily expired entry");
            return Lookup::Expired;
        }

        match self.entries.get_mut(key) {
            Some(slot) => {
                self.recency.remove(&slot.recency_key());
                slot.entry.touch(now);
                self.recency.insert(slot.recency_key(), *key);
                Lookup::Hit(&mut slot.entry)
            }
            None => Lookup::Miss,
        }
    }

    /// Read a live entry without touching access metadata.
    #[must_use]
    pub fn peek(&self, key: &CacheKey, now: Instant) -> Option<&CacheEntry<V>> {
        self.entries
            .get(key)
            .map(|slot| &slot.entry)
            .filter(|entry| !entry.is_expired_at(now))
    }

    /// Whether the key is stored, expired or not.
    #[must_use]
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove and return the entry for `key`.
    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry<V>> {
        let slot = self.entries.remove(key)?;
        if self.recency.remove(&slot.recency_key()).is_none() {
            error!(tier = %self.level, key = %key, "Recency index missing entry on remove");
        }
        self.bytes_used = self.bytes_used.saturating_sub(slot.entry.memory_size());
        Some(slot.entry)
    }

    /// Remove every entry whose TTL has elapsed at `now`.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.bytes_used = 0;
    }

    /// Keys from least to most recently used.
    #[must_use]
    pub fn keys_lru_order(&self) -> Vec<CacheKey> {
        self.recency.values().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn level(&self) -> TierLevel {
        self.level
    }

    /// Estimated bytes held by this tier.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bytes_used
    }

    fn enforce_capacity(&mut self) -> Vec<CacheEntry<V>> {
        let mut evicted = Vec::new();

        while self.entries.len() > self.capacity {
            let Some((_, key)) = self.recency.pop_first() else {
                error!(
                    tier = %self.level,
                    len = self.entries.len(),
                    "Recency index empty while over capacity, rebuilding"
                );
                self.rebuild_index();
                continue;
            };

            match self.entries.remove(&key) {
                Some(slot) => {
                    self.bytes_used = self.bytes_used.saturating_sub(slot.entry.memory_size());
                    debug!(tier = %self.level, key = %key, "Evicted least recently used entry");
                    evicted.push(slot.entry);
                }
                None => {
                    error!(tier = %self.level, key = %key, "Dropping stale recency record");
                }
            }
        }

        evicted
    }

    fn rebuild_index(&mut self) {
        self.recency = self
            .entries
            .iter()
            .map(|(key, slot)| (slot.recency_key(), *key))
            .collect();
    }
}
