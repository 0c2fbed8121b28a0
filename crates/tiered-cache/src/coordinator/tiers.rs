//! The three tiers and the promotion/demotion state machine.
//!
//! Everything here runs with the coordinator lock held. One call may touch
//! several tiers (a promotion followed by a demotion cascade); holding one
//! lock over all three tiers keeps those steps atomic.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::TieredCacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::metrics::MetricsRecorder;
use crate::tier::{Lookup, Tier};
use crate::types::{CacheEntry, CacheKey, TierLevel};

/// Entry counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSizes {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl TierSizes {
    #[must_use]
    pub fn total(&self) -> usize {
        self.hot + self.warm + self.cold
    }
}

/// When a hit earns a move to the next hotter tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PromotionPolicy {
    /// Warm → hot once `tier_hits` exceeds this.
    pub warm_threshold: u32,
    /// Cold → warm once `access_count` exceeds this.
    pub cold_threshold: u32,
}

impl PromotionPolicy {
    pub(crate) fn from_config(config: &TieredCacheConfig) -> Self {
        Self {
            warm_threshold: config.warm_promotion_threshold,
            cold_threshold: config.cold_promotion_threshold,
        }
    }

    fn should_promote<V>(&self, level: TierLevel, entry: &CacheEntry<V>) -> bool {
        match level {
            TierLevel::Hot => false,
            TierLevel::Warm => entry.tier_hits() > self.warm_threshold,
            TierLevel::Cold => entry.access_count() > self.cold_threshold,
        }
    }
}

/// Hot, warm and cold tiers plus the policy that moves entries between them.
///
/// # Invariants
/// - a key is resident in at most one tier
/// - each tier is within its capacity
#[derive(Debug)]
pub(crate) struct TierSet<V> {
    hot: Tier<V>,
    warm: Tier<V>,
    cold: Tier<V>,
    policy: PromotionPolicy,
}

impl<V: Clone> TierSet<V> {
    pub(crate) fn new(config: &TieredCacheConfig) -> Self {
        Self {
            hot: Tier::new(TierLevel::Hot, config.hot_capacity),
            warm: Tier::new(TierLevel::Warm, config.warm_capacity),
            cold: Tier::new(TierLevel::Cold, config.cold_capacity),
            policy: PromotionPolicy::from_config(config),
        }
    }

    pub(crate) fn tier(&self, level: TierLevel) -> &Tier<V> {
        match level {
            TierLevel::Hot => &self.hot,
            TierLevel::Warm => &self.warm,
            TierLevel::Cold => &self.cold,
        }
    }

    fn tier_mut(&mut self, level: TierLevel) -> &mut Tier<V> {
        match level {
            TierLevel::Hot => &mut self.hot,
            TierLevel::Warm => &mut self.warm,
            TierLevel::Cold => &mut self.cold,
        }
    }

    /// Hot → warm → cold lookup. Records exactly one hit or miss.
    ///
    /// A warm or cold hit that crosses its threshold promotes the entry
    /// after the value is read; the hit is credited to the serving tier.
    pub(crate) fn get(
        &mut self,
        key: &CacheKey,
        now: Instant,
        metrics: &MetricsRecorder,
    ) -> Option<(V, TierLevel)> {
        let policy = self.policy;

        for level in TierLevel::ALL {
            let found = match self.tier_mut(level).get(key, now) {
                Lookup::Hit(entry) => {
                    Some((entry.value.clone(), policy.should_promote(level, entry)))
                }
                Lookup::Expired => {
                    metrics.record_expirations(1);
                    None
                }
                Lookup::Miss => None,
            };

            if let Some((value, promote)) = found {
                metrics.record_hit(level);
                if promote {
                    self.promote(level, key, now, metrics);
                }
                return Some((value, level));
            }
        }

        metrics.record_miss();
        None
    }

    /// Replace any resident copy with a fresh entry in the cold tier.
    pub(crate) fn set(
        &mut self,
        entry: CacheEntry<V>,
        now: Instant,
        metrics: &MetricsRecorder,
    ) {
        let key = entry.key;
        self.delete(&key);
        self.insert_cascading(TierLevel::Cold, entry, now, metrics);
        self.verify_residency(&key);
    }

    /// Remove `key` from every tier. True if anything was removed.
    pub(crate) fn delete(&mut self, key: &CacheKey) -> bool {
        let mut removed = false;
        for level in TierLevel::ALL {
            removed |= self.tier_mut(level).remove(key).is_some();
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        for level in TierLevel::ALL {
            self.tier_mut(level).clear();
        }
    }

    /// Remove every expired entry from every tier.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> usize {
        TierLevel::ALL
            .into_iter()
            .map(|level| self.tier_mut(level).purge_expired(now))
            .sum()
    }

    /// Tier holding a live copy of `key`.
    pub(crate) fn tier_of(&self, key: &CacheKey, now: Instant) -> Option<TierLevel> {
        TierLevel::ALL
            .into_iter()
            .find(|level| self.tier(*level).peek(key, now).is_some())
    }

    pub(crate) fn sizes(&self) -> TierSizes {
        TierSizes {
            hot: self.hot.len(),
            warm: self.warm.len(),
            cold: self.cold.len(),
        }
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.hot.memory_usage() + self.warm.memory_usage() + self.cold.memory_usage()
    }

    /// Full invariant scan: capacities and single residency.
    ///
    /// O(total entries); meant for diagnostics and tests.
    pub(crate) fn check_invariants(&self) -> CacheResult<()> {
        for level in TierLevel::ALL {
            let tier = self.tier(level);
            if tier.len() > tier.capacity() {
                return Err(CacheError::InvariantViolation {
                    message: format!(
                        "{} tier holds {} entries, capacity {}",
                        level,
                        tier.len(),
                        tier.capacity()
                    ),
                });
            }
        }

        for key in self.hot.keys_lru_order().iter().chain(&self.warm.keys_lru_order()) {
            let holders = self.holders(key);
            if holders.len() > 1 {
                return Err(CacheError::InvariantViolation {
                    message: format!("key {} resident in {:?}", key, holders),
                });
            }
        }
        Ok(())
    }

    /// Move `key` from `from` to the next hotter tier.
    fn promote(
        &mut self,
        from: TierLevel,
        key: &CacheKey,
        now: Instant,
        metrics: &MetricsRecorder,
    ) {
        let Some(target) = from.hotter() else {
            return;
        };
        let Some(mut entry) = self.tier_mut(from).remove(key) else {
            return;
        };

        entry.reset_tier_hits();
        metrics.record_promotion();
        debug!(key = %key, from = %from, to = %target, "Promoted entry");

        self.insert_cascading(target, entry, now, metrics);
        self.verify_residency(key);
    }

    /// Insert into `level`; each eviction is demoted one tier colder until
    /// something falls out of the cold tier. Expired evictees are dropped.
    fn insert_cascading(
        &mut self,
        level: TierLevel,
        entry: CacheEntry<V>,
        now: Instant,
        metrics: &MetricsRecorder,
    ) {
        let mut level = level;
        let mut batch = vec![entry];

        loop {
            let mut evicted = Vec::new();
            for entry in batch {
                evicted.extend(self.tier_mut(level).put(entry));
            }

            let before = evicted.len();
            evicted.retain(|entry| !entry.is_expired_at(now));
            let expired = before - evicted.len();
            if expired > 0 {
                metrics.record_expirations(expired as u64);
            }

            if evicted.is_empty() {
                return;
            }

            match level.colder() {
                Some(colder) => {
                    for entry in &mut evicted {
                        entry.reset_tier_hits();
                        debug!(key = %entry.key, from = %level, to = %colder, "Demoted entry");
                    }
                    metrics.record_demotions(evicted.len() as u64);
                    level = colder;
                    batch = evicted;
                }
                None => {
                    debug!(count = evicted.len(), "Dropped entries from cold tier");
                    metrics.record_evictions(evicted.len() as u64);
                    return;
                }
            }
        }
    }

    fn holders(&self, key: &CacheKey) -> Vec<TierLevel> {
        TierLevel::ALL
            .into_iter()
            .filter(|level| self.tier(*level).contains_key(key))
            .collect()
    }

    /// Keep only the hottest copy of `key` if it somehow landed in two tiers.
    fn verify_residency(&mut self, key: &CacheKey) {
        let holders = self.holders(key);
        debug_assert!(
            holders.len() <= 1,
            "key {} resident in {:?}",
            key,
            holders
        );
        if holders.len() <= 1 {
            return;
        }

        error!(key = %key, tiers = ?holders, "Key resident in multiple tiers, keeping hottest copy");
        for level in &holders[1..] {
            self.tier_mut(*level).remove(key);
        }
    }
}
