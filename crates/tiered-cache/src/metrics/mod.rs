//! Hit/miss accounting, latency and the performance dashboard.
//!
//! [`MetricsRecorder`] holds lock-free counters updated on every lookup.
//! Readers take plain snapshots: [`MetricsSnapshot`], [`HitRatios`] and
//! [`PerformanceStatus`].

mod recorder;
mod snapshot;

#[cfg(test)]
mod tests;

pub use recorder::MetricsRecorder;
pub use snapshot::{HitRatios, MetricsSnapshot, PerformanceStatus};
