//! WarmupRunner and the cache-side interface it drives.

use std::collections::HashSet;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CacheError, CacheResult};
use crate::types::CacheKey;

use super::producer::ValueProducer;

/// Cache operations warmup needs. Each call is individually serialized by
/// the implementing cache; the producer runs between them, unlocked.
pub trait WarmTarget<V>: Send + Sync {
    /// Live entry present (no metrics, no LRU refresh).
    fn contains_key(&self, key: &CacheKey) -> bool;

    /// Store a produced value.
    fn store(&self, key: CacheKey, value: V) -> CacheResult<()>;
}

/// One input that could not be warmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupFailure {
    pub input: String,
    pub message: String,
}

/// Outcome of a warmup batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupReport {
    /// Inputs passed in, duplicates included
    pub requested: usize,
    /// Inputs that normalized to a key already seen in this batch
    pub duplicates: usize,
    /// Keys already live in the cache; producer not called
    pub already_cached: usize,
    /// Keys produced and stored
    pub loaded: usize,
    /// Producer or store failures, logged and skipped
    pub failed: Vec<WarmupFailure>,
}

impl WarmupReport {
    /// True when no input failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    AlreadyCached,
    Loaded,
    Failed(WarmupFailure),
}

/// Drives a [`ValueProducer`] for every input missing from a [`WarmTarget`].
///
/// Keys are derived with [`CacheKey::from_parts`], so warmup lands on the
/// same keys as regular lookups using the same discriminators.
#[derive(Debug, Clone, Default)]
pub struct WarmupRunner {
    discriminators: Vec<String>,
}

impl WarmupRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash these discriminators (model name, mode, ...) into every key.
    #[must_use]
    pub fn with_discriminators<I, S>(mut self, discriminators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.discriminators = discriminators.into_iter().map(Into::into).collect();
        self
    }

    /// Key a lookup for `input` resolves to.
    #[must_use]
    pub fn key_for(&self, input: &str) -> CacheKey {
        let parts: Vec<&str> = self.discriminators.iter().map(String::as_str).collect();
        CacheKey::from_parts(input, &parts)
    }

    /// Warm `target` with every input it does not already hold.
    ///
    /// All attempts run concurrently; resolves once each one has succeeded
    /// or failed. Failures are logged and reported, never propagated.
    pub async fn run<V, T, P, I, S>(&self, target: &T, inputs: I, producer: &P) -> WarmupReport
    where
        T: WarmTarget<V> + ?Sized,
        P: ValueProducer<V> + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inputs: Vec<String> = inputs.into_iter().map(Into::into).collect();
        let mut report = WarmupReport {
            requested: inputs.len(),
            ..WarmupReport::default()
        };

        let mut seen = HashSet::with_capacity(inputs.len());
        let attempts: Vec<_> = inputs
            .iter()
            .filter_map(|input| {
                let key = self.key_for(input);
                seen.insert(key)
                    .then(|| Self::warm_one::<V, T, P>(target, producer, input, key))
            })
            .collect();
        report.duplicates = inputs.len() - attempts.len();

        for outcome in join_all(attempts).await {
            match outcome {
                Outcome::AlreadyCached => report.already_cached += 1,
                Outcome::Loaded => report.loaded += 1,
                Outcome::Failed(failure) => report.failed.push(failure),
            }
        }

        info!(
            requested = report.requested,
            loaded = report.loaded,
            already_cached = report.already_cached,
            failed = report.failed.len(),
            "Cache warmup finished"
        );
        report
    }

    async fn warm_one<V, T, P>(target: &T, producer: &P, input: &str, key: CacheKey) -> Outcome
    where
        T: WarmTarget<V> + ?Sized,
        P: ValueProducer<V> + ?Sized,
    {
        if target.contains_key(&key) {
            debug!(key = %key, "Warmup skipped, already cached");
            return Outcome::AlreadyCached;
        }

        let value = match producer.produce(input).await {
            Ok(value) => value,
            Err(source) => {
                let err = CacheError::ProducerError {
                    input: input.to_owned(),
                    source,
                };
                warn!(key = %key, error = %err, "Warmup producer failed, skipping");
                return Outcome::Failed(WarmupFailure {
                    input: input.to_owned(),
                    message: err.to_string(),
                });
            }
        };

        match target.store(key, value) {
            Ok(()) => Outcome::Loaded,
            Err(err) => {
                warn!(key = %key, error = %err, "Warmup store failed, skipping");
                Outcome::Failed(WarmupFailure {
                    input: input.to_owned(),
                    message: err.to_string(),
                })
            }
        }
    }
}
