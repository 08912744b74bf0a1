//! Metrics hooks for seal and open
//!
//! ## Usage
//!
//! ```ignore
//! use signed_envelope::metrics::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let codec = SignedEnvelopeCodec::new(config)?.with_metrics(metrics.clone());
//!
//! codec.seal(&value, &salts)?;
//! assert_eq!(metrics.snapshot().seals, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How an `open` call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Recomputed envelope matched.
    Trusted,
    /// Mismatch or undecodable payload.
    Untrusted,
    /// Could not be parsed at all.
    Malformed,
}

/// Thread-safe counters for codec operations.
#[derive(Default)]
pub struct Metrics {
    /// Envelopes sealed
    pub seals: AtomicU64,
    /// Opens that were trusted
    pub opens_trusted: AtomicU64,
    /// Opens that failed the trust check
    pub opens_untrusted: AtomicU64,
    /// Opens rejected as malformed
    pub opens_malformed: AtomicU64,
    /// Cumulative seal time in nanoseconds
    pub seal_time_ns: AtomicU64,
    /// Cumulative open time in nanoseconds
    pub open_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_seal(&self, duration: Duration) {
        self.seals.fetch_add(1, Ordering::Relaxed);
        self.seal_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_open(&self, duration: Duration, outcome: OpenOutcome) {
        let counter = match outcome {
            OpenOutcome::Trusted => &self.opens_trusted,
            OpenOutcome::Untrusted => &self.opens_untrusted,
            OpenOutcome::Malformed => &self.opens_malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.open_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Total opens regardless of outcome
    pub fn opens(&self) -> u64 {
        self.opens_trusted.load(Ordering::Relaxed)
            + self.opens_untrusted.load(Ordering::Relaxed)
            + self.opens_malformed.load(Ordering::Relaxed)
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let seals = self.seals.load(Ordering::Relaxed);
        let opens = self.opens();
        MetricsSnapshot {
            seals,
            opens_trusted: self.opens_trusted.load(Ordering::Relaxed),
            opens_untrusted: self.opens_untrusted.load(Ordering::Relaxed),
            opens_malformed: self.opens_malformed.load(Ordering::Relaxed),
            avg_seal_ns: average(self.seal_time_ns.load(Ordering::Relaxed), seals),
            avg_open_ns: average(self.open_time_ns.load(Ordering::Relaxed), opens),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.seals.store(0, Ordering::Relaxed);
        self.opens_trusted.store(0, Ordering::Relaxed);
        self.opens_untrusted.store(0, Ordering::Relaxed);
        self.opens_malformed.store(0, Ordering::Relaxed);
        self.seal_time_ns.store(0, Ordering::Relaxed);
        self.open_time_ns.store(0, Ordering::Relaxed);
    }
}

fn average(total: u64, count: u64) -> u64 {
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub seals: u64,
    pub opens_trusted: u64,
    pub opens_untrusted: u64,
    pub opens_malformed: u64,
    pub avg_seal_ns: u64,
    pub avg_open_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward codec activity to an external metrics
/// system.
pub trait MetricsRecorder: Send + Sync {
    fn record_seal(&self, duration: Duration);

    fn record_open(&self, duration: Duration, outcome: OpenOutcome);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_seal(&self, _: Duration) {}
    fn record_open(&self, _: Duration, _: OpenOutcome) {}
}

impl MetricsRecorder for Metrics {
    fn record_seal(&self, duration: Duration) {
        Metrics::record_seal(self, duration);
    }

    fn record_open(&self, duration: Duration, outcome: OpenOutcome) {
        Metrics::record_open(self, duration, outcome);
    }
}
