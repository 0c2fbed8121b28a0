//! TieredCache: the public coordinator API.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::cleanup::{CleanupScheduler, Sweep};
use crate::config::TieredCacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::metrics::{HitRatios, MetricsRecorder, MetricsSnapshot, PerformanceStatus};
use crate::types::{CacheEntry, CacheKey, MemorySize, TierLevel};
use crate::warmup::{ValueProducer, WarmTarget, WarmupReport, WarmupRunner};

use super::tiers::{TierSet, TierSizes};

/// State shared with the cleanup task.
struct Shared<V> {
    tiers: Mutex<TierSet<V>>,
    metrics: MetricsRecorder,
}

impl<V> Sweep for Shared<V>
where
    V: Clone + Send + 'static,
{
    fn sweep_expired(&self) -> usize {
        let removed = self.tiers.lock().purge_expired(Instant::now());
        self.metrics.record_expirations(removed as u64);
        removed
    }
}

/// Hot/warm/cold cache with frequency-driven promotion.
///
/// New entries always land in the cold tier; only repeated reads move them
/// up. Cheap to share behind an `Arc`: every method takes `&self`.
///
/// # Example
///
/// ```
/// use tiered_cache::{CacheKey, TierLevel, TieredCache, TieredCacheConfig};
///
/// let config = TieredCacheConfig {
///     cleanup_interval_ms: 0,
///     ..TieredCacheConfig::with_capacities(1, 2, 5)
/// };
/// let cache = TieredCache::new(config).unwrap();
/// let key = CacheKey::from_content("a");
///
/// cache.set(key, 1u32, None);
/// assert_eq!(cache.tier_of(&key), Some(TierLevel::Cold));
/// assert_eq!(cache.get(&key), Some(1));
/// ```
pub struct TieredCache<V> {
    shared: Arc<Shared<V>>,
    cleanup: Mutex<Option<CleanupScheduler>>,
    config: TieredCacheConfig,
}

impl<V> TieredCache<V>
where
    V: Clone + MemorySize + Send + 'static,
{
    /// Create a cache and start its expiry sweep.
    ///
    /// Outside a tokio runtime the sweep is skipped with a warning; expired
    /// entries are then only removed when looked up.
    ///
    /// # Errors
    /// `CacheError::ConfigError` if the configuration is invalid.
    pub fn new(config: TieredCacheConfig) -> CacheResult<Self> {
        if let Err(e) = config.validate() {
            error!("TieredCache config error: {}", e);
            return Err(e);
        }

        let shared = Arc::new(Shared {
            tiers: Mutex::new(TierSet::new(&config)),
            metrics: MetricsRecorder::new(),
        });

        let cleanup = match config.cleanup_interval() {
            Some(interval) => {
                let target: Weak<dyn Sweep> = Arc::downgrade(&shared) as Weak<dyn Sweep>;
                match CleanupScheduler::spawn(target, interval) {
                    Ok(scheduler) => Some(scheduler),
                    Err(CacheError::RuntimeUnavailable { message }) => {
                        warn!(%message, "Expiry sweep disabled, relying on lazy expiry");
                        None
                    }
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        info!(
            hot = config.hot_capacity,
            warm = config.warm_capacity,
            cold = config.cold_capacity,
            sweep = cleanup.is_some(),
            "TieredCache created"
        );

        Ok(Self {
            shared,
            cleanup: Mutex::new(cleanup),
            config,
        })
    }

    /// Look up `key`, hottest tier first.
    ///
    /// Counts one hit or miss plus a latency sample. May promote the entry.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.get_with_tier(key).map(|(value, _)| value)
    }

    /// Like [`get`](Self::get), also reporting the tier that served the hit.
    #[must_use]
    pub fn get_with_tier(&self, key: &CacheKey) -> Option<(V, TierLevel)> {
        let start = Instant::now();
        let mut tiers = self.shared.tiers.lock();
        let found = tiers.get(key, start, &self.shared.metrics);
        self.shared.metrics.record_latency(start.elapsed());
        found
    }

    /// Store `value` in the cold tier, replacing any copy in any tier.
    ///
    /// `ttl` falls back to the configured default.
    pub fn set(&self, key: CacheKey, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        let ttl = ttl.or_else(|| self.config.default_ttl());
        let entry = CacheEntry::new_at(key, value, ttl, now);
        self.shared
            .tiers
            .lock()
            .set(entry, now, &self.shared.metrics);
    }

    /// Remove `key` from every tier. Returns whether anything was removed.
    pub fn delete(&self, key: &CacheKey) -> bool {
        self.shared.tiers.lock().delete(key)
    }

    /// Empty every tier and reset metrics.
    pub fn clear(&self) {
        let mut tiers = self.shared.tiers.lock();
        tiers.clear();
        self.shared.metrics.reset();
        debug!("TieredCache cleared");
    }

    /// Remove every expired entry now, without waiting for the sweep.
    pub fn purge_expired(&self) -> usize {
        self.shared.sweep_expired()
    }

    /// Whether a live entry exists. Records no metrics and moves nothing.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.tier_of(key).is_some()
    }

    /// Tier currently holding a live copy of `key`.
    #[must_use]
    pub fn tier_of(&self, key: &CacheKey) -> Option<TierLevel> {
        self.shared.tiers.lock().tier_of(key, Instant::now())
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        let memory = self.shared.tiers.lock().memory_usage();
        self.shared.metrics.snapshot(memory)
    }

    #[must_use]
    pub fn hit_ratios(&self) -> HitRatios {
        self.metrics().hit_ratios()
    }

    #[must_use]
    pub fn performance_status(&self) -> PerformanceStatus {
        self.metrics().performance_status()
    }

    #[must_use]
    pub fn tier_sizes(&self) -> TierSizes {
        self.shared.tiers.lock().sizes()
    }

    /// Entries across all tiers, expired ones not yet purged included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tier_sizes().total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn config(&self) -> &TieredCacheConfig {
        &self.config
    }

    /// Scan all tiers for capacity and single-residency violations.
    ///
    /// # Errors
    /// `CacheError::InvariantViolation` describing the first violation.
    pub fn verify_invariants(&self) -> CacheResult<()> {
        self.shared.tiers.lock().check_invariants()
    }

    /// Whether the background expiry sweep is active.
    #[must_use]
    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .as_ref()
            .is_some_and(CleanupScheduler::is_running)
    }

    /// Stop the expiry sweep. Safe to call more than once.
    pub fn shutdown(&self) {
        if let Some(mut scheduler) = self.cleanup.lock().take() {
            scheduler.stop();
        }
    }

    /// Produce and store every input not already cached.
    ///
    /// Values enter the cold tier like any other `set`.
    pub async fn warm_up<P, I, S>(&self, inputs: I, producer: &P) -> WarmupReport
    where
        P: ValueProducer<V> + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        WarmupRunner::new()
            .run::<V, Self, P, I, S>(self, inputs, producer)
            .await
    }
}

impl<V> WarmTarget<V> for TieredCache<V>
where
    V: Clone + MemorySize + Send + 'static,
{
    fn contains_key(&self, key: &CacheKey) -> bool {
        self.contains(key)
    }

    fn store(&self, key: CacheKey, value: V) -> CacheResult<()> {
        self.set(key, value, None);
        Ok(())
    }
}

impl<V> std::fmt::Debug for TieredCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("config", &self.config)
            .field("cleanup_running", &self.cleanup.lock().is_some())
            .finish()
    }
}
