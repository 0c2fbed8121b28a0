//! Core TtlCache implementation with LRU eviction.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Instant;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::cleanup::{CleanupScheduler, Sweep};
use crate::config::TtlCacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::types::{CacheEntry, CacheKey, MemorySize};
use crate::warmup::{ValueProducer, WarmTarget, WarmupReport, WarmupRunner};

use super::stats::{TtlCacheStats, TtlCacheStatsSnapshot};

/// LRU cache with a fixed time-to-live per entry.
///
/// # Eviction Strategy
///
/// 1. TTL expiration: entries older than `ttl_seconds` are removed on
///    access or by a sweep
/// 2. LRU eviction: when `max_entries` is reached, least recently used
///    entries are removed
/// 3. Memory eviction: when `max_bytes` would be exceeded, least recently
///    used entries are removed until the new entry fits
pub struct TtlCache<V> {
    /// Entries in LRU order, front = least recently used.
    entries: Mutex<LinkedHashMap<CacheKey, CacheEntry<V>>>,
    /// Immutable after creation.
    config: TtlCacheConfig,
    stats: TtlCacheStats,
}

impl<V> TtlCache<V>
where
    V: Clone + MemorySize + Send + 'static,
{
    /// Create a cache with the given configuration.
    ///
    /// # Errors
    /// `CacheError::ConfigError` if the configuration is invalid.
    pub fn new(config: TtlCacheConfig) -> CacheResult<Self> {
        if let Err(e) = config.validate() {
            error!("TtlCache config error: {}", e);
            return Err(e);
        }

        Ok(Self {
            entries: Mutex::new(LinkedHashMap::new()),
            config,
            stats: TtlCacheStats::new(),
        })
    }

    /// Get a value, refreshing its LRU position.
    ///
    /// Returns `None` when the key is absent or expired; an expired entry
    /// is removed.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_refresh(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.touch(now);
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => {
                Self::remove_locked(&mut entries, &self.stats, key);
                self.stats.record_expirations(1);
            }
            None => {}
        }

        self.stats.record_miss();
        None
    }

    /// Whether a live entry exists. Does not refresh LRU order or count
    /// as a hit or miss.
    #[must_use]
    pub fn has(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get(key).map(|entry| entry.is_expired_at(now)) {
            None => false,
            Some(false) => true,
            Some(true) => {
                Self::remove_locked(&mut entries, &self.stats, key);
                self.stats.record_expirations(1);
                false
            }
        }
    }

    /// Insert a value, evicting LRU entries if needed.
    ///
    /// # Errors
    /// `CacheError::EntryTooLarge` if the entry alone exceeds `max_bytes`.
    pub fn put(&self, key: CacheKey, value: V) -> CacheResult<()> {
        let entry = CacheEntry::new(key, value, self.config.ttl());
        let entry_size = entry.memory_size();

        if entry_size > self.config.max_bytes {
            error!(
                "TtlCache put error: entry size {} exceeds max_bytes {}",
                entry_size, self.config.max_bytes
            );
            return Err(CacheError::EntryTooLarge {
                size: entry_size,
                max: self.config.max_bytes,
            });
        }

        let mut entries = self.entries.lock();

        // Overwrite in place: drop the old entry first so it is not evicted
        // as someone else's victim.
        Self::remove_locked(&mut entries, &self.stats, &key);

        while entries.len() >= self.config.max_entries {
            if self.evict_oldest(&mut entries).is_none() {
                break;
            }
        }

        let mut projected = self.stats.bytes_used.load(Ordering::Relaxed) + entry_size;
        while projected > self.config.max_bytes {
            match self.evict_oldest(&mut entries) {
                Some(evicted) => projected = projected.saturating_sub(evicted),
                None => break,
            }
        }

        entries.insert(key, entry);
        self.stats.add_bytes(entry_size);
        Ok(())
    }

    /// Remove an entry, returning its value.
    pub fn remove(&self, key: &CacheKey) -> Option<V> {
        let mut entries = self.entries.lock();
        Self::remove_locked(&mut entries, &self.stats, key).map(|entry| entry.value)
    }

    /// Remove everything and reset stats.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.stats.reset();
    }

    /// Remove every expired entry.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            Self::remove_locked(&mut entries, &self.stats, key);
        }
        self.stats.record_expirations(expired.len() as u64);
        expired.len()
    }

    /// Attach a background sweep using `cleanup_interval_ms`.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` if the interval is 0
    /// - `CacheError::RuntimeUnavailable` outside a tokio runtime
    pub fn spawn_cleanup(self: &Arc<Self>) -> CacheResult<CleanupScheduler> {
        let interval = self
            .config
            .cleanup_interval()
            .ok_or_else(|| CacheError::config("cleanup_interval_ms is 0, sweep disabled"))?;
        let target: Weak<dyn Sweep> = Arc::downgrade(self) as Weak<dyn Sweep>;
        CleanupScheduler::spawn(target, interval)
    }

    /// Produce and store every input not already cached.
    ///
    /// Keys are [`CacheKey::from_content`] of each input.
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

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// hits / (hits + misses).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Current estimated memory usage in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.stats.bytes_used.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn stats(&self) -> TtlCacheStatsSnapshot {
        let entries = self.len();
        self.stats.snapshot(entries)
    }

    #[must_use]
    pub fn config(&self) -> &TtlCacheConfig {
        &self.config
    }

    /// Evict the front (least recently used) entry, returning its size.
    fn evict_oldest(&self, entries: &mut LinkedHashMap<CacheKey, CacheEntry<V>>) -> Option<usize> {
        let (key, entry) = entries.pop_front()?;
        let size = entry.memory_size();
        self.stats.subtract_bytes(size);
        self.stats.record_eviction();
        debug!(key = %key, size, "TtlCache evicted least recently used entry");
        Some(size)
    }

    fn remove_locked(
        entries: &mut LinkedHashMap<CacheKey, CacheEntry<V>>,
        stats: &TtlCacheStats,
        key: &CacheKey,
    ) -> Option<CacheEntry<V>> {
        let entry = entries.remove(key)?;
        stats.subtract_bytes(entry.memory_size());
        Some(entry)
    }
}

impl<V> Sweep for TtlCache<V>
where
    V: Clone + MemorySize + Send + 'static,
{
    fn sweep_expired(&self) -> usize {
        self.purge_expired()
    }
}

impl<V> WarmTarget<V> for TtlCache<V>
where
    V: Clone + MemorySize + Send + 'static,
{
    fn contains_key(&self, key: &CacheKey) -> bool {
        self.has(key)
    }

    fn store(&self, key: CacheKey, value: V) -> CacheResult<()> {
        self.put(key, value)
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.lock().len())
            .field("config", &self.config)
            .finish()
    }
}
