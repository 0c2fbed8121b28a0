//! CleanupScheduler: periodic background removal of expired entries.
//!
//! # Lifecycle
//! 1. `spawn()` starts a tokio task ticking every `interval`
//! 2. Each tick upgrades a weak handle to the target and calls `sweep_expired()`
//! 3. `stop()` signals the task; stopping twice is a no-op
//!
//! The task only holds a `Weak` reference, so it never keeps its cache
//! alive. It exits on its own once the cache is dropped, and a runtime
//! shutdown cancels it like any other task.


use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::{CacheError, CacheResult};

/// Something holding entries that can expire.
///
/// Implementations must take the same lock as their regular operations.
pub trait Sweep: Send + Sync {
    /// Remove every expired entry and return how many were removed.
    fn sweep_expired(&self) -> usize;
}

/// Handle to a running expiry sweep task.
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct CleanupScheduler {
    /// Sweep task handle.
    handle: Option<JoinHandle<()>>,
    /// Shutdown signal.
    shutdown_notify: Arc<Notify>,
    /// Running state.
    is_running: Arc<AtomicBool>,
    /// Completed sweeps.
    sweeps: Arc<AtomicU64>,
    interval: Duration,
}

impl CleanupScheduler {
    /// Start sweeping `target` every `interval` on the current tokio runtime.
    ///
    /// The first sweep happens one full interval after spawning.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` if `interval` is zero
    /// - `CacheError::RuntimeUnavailable` if called outside a tokio runtime
    pub fn spawn(target: Weak<dyn Sweep>, interval: Duration) -> CacheResult<Self> {
        if interval.is_zero() {
            return Err(CacheError::config("cleanup interval must be > 0"));
        }

        let runtime = Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable {
            message: format!("cleanup scheduler needs a tokio runtime: {}", e),
        })?;

        let shutdown_notify = Arc::new(Notify::new());
        let is_running = Arc::new(AtomicBool::new(true));
        let sweeps = Arc::new(AtomicU64::new(0));

        let handle = runtime.spawn(Self::sweep_loop(
            target,
            interval,
            shutdown_notify.clone(),
            is_running.clone(),
            sweeps.clone(),
        ));

        info!(interval_ms = interval.as_millis() as u64, "Cleanup scheduler started");

        Ok(Self {
            handle: Some(handle),
            shutdown_notify,
            is_running,
            sweeps,
            interval,
        })
    }

    async fn sweep_loop(
        target: Weak<dyn Sweep>,
        interval: Duration,
        shutdown_notify: Arc<Notify>,
        is_running: Arc<AtomicBool>,
        sweeps: Arc<AtomicU64>,
    ) {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_notify.notified() => break,

                _ = ticker.tick() => {
                    if !is_running.load(Ordering::Acquire) {
                        break;
                    }

                    let Some(target) = target.upgrade() else {
                        debug!("Sweep target dropped, stopping cleanup scheduler");
                        break;
                    };

                    let removed = target.sweep_expired();
                    drop(target);
                    sweeps.fetch_add(1, Ordering::Relaxed);

                    if removed > 0 {
                        debug!(removed, "Expiry sweep removed entries");
                    }
                }
            }
        }

        is_running.store(false, Ordering::Release);
    }

    /// Signal the task to stop. Returns false if it was already stopped.
    ///
    /// The task exits at its next wake-up and never sweeps again.
    pub fn stop(&mut self) -> bool {
        if !self.is_running.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.shutdown_notify.notify_one();
        info!("Cleanup scheduler stopped");
        true
    }

    /// Stop, then wait for the task to finish.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Whether the task is still scheduled to sweep.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Number of sweeps completed so far.
    #[must_use]
    pub fn sweeps_completed(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for CleanupScheduler {
    fn drop(&mut self) {
        self.is_running.store(false, Ordering::Release);
        self.shutdown_notify.notify_one();
    }
}
