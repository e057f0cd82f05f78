//! Metrics recorder for the import relay.
//!
//! The pipeline reports counts through the [`MetricsRecorder`] trait so
//! the sink can be substituted in tests. Failure counts are labeled by
//! category plus a bounded detail string to keep label cardinality under
//! control.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::classifier::{sanitize_detail, FailureCategory};

/// Sink for relay counters and gauges.
///
/// All methods must be safe to call concurrently from any worker.
pub trait MetricsRecorder: Send + Sync {
    /// A message was pulled from the request topic.
    fn message_received(&self);
    /// A message failed structural decoding.
    fn message_invalid(&self);
    /// The gateway returned a business response for a message.
    fn import_processed(&self);
    /// The remote service imported the index.
    fn import_succeeded(&self);
    /// The remote service reported the index already exists.
    fn import_already_exists(&self);
    /// A failure occurred, labeled by category and bounded detail.
    fn import_failed(&self, category: FailureCategory, detail: &str);
    /// A failure envelope reached the failure topic.
    fn failure_published(&self);
    /// A worker started processing a message.
    fn in_flight_inc(&self);
    /// A worker finished processing a message.
    fn in_flight_dec(&self);
    /// End-to-end processing time of one message.
    fn record_latency(&self, elapsed: Duration);
}

/// In-process metrics recorder backed by atomic counters.
#[derive(Default)]
pub struct RelayMetrics {
    received: AtomicU64,
    invalid: AtomicU64,
    processed: AtomicU64,
    succeeded: AtomicU64,
    already_exists: AtomicU64,
    published: AtomicU64,
    in_flight: AtomicI64,
    latency_count: AtomicU64,
    latency_total_ms: AtomicU64,
    latency_max_ms: AtomicU64,
    failures: Mutex<HashMap<(&'static str, String), u64>>,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let count = self.latency_count.load(Ordering::Relaxed);
        let total = self.latency_total_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            already_exists: self.already_exists.load(Ordering::Relaxed),
            failures_published: self.published.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            mean_latency_ms: if count > 0 {
                total as f64 / count as f64
            } else {
                0.0
            },
            max_latency_ms: self.latency_max_ms.load(Ordering::Relaxed),
            failures: self
                .failures
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .iter()
                .map(|((category, detail), count)| FailureCount {
                    category: category.to_string(),
                    detail: detail.clone(),
                    count: *count,
                })
                .collect(),
        }
    }
}

impl MetricsRecorder for RelayMetrics {
    fn message_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    fn message_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    fn import_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    fn import_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    fn import_already_exists(&self) {
        self.already_exists.fetch_add(1, Ordering::Relaxed);
    }

    fn import_failed(&self, category: FailureCategory, detail: &str) {
        // Label cardinality stays bounded regardless of the caller.
        let detail = sanitize_detail(Some(detail));
        *self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry((category.as_str(), detail))
            .or_insert(0) += 1;
    }

    fn failure_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    fn in_flight_inc(&self) {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
    }

    fn in_flight_dec(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    fn record_latency(&self, elapsed: Duration) {
        let ms = elapsed.as_millis() as u64;
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        self.latency_total_ms.fetch_add(ms, Ordering::Relaxed);
        self.latency_max_ms.fetch_max(ms, Ordering::Relaxed);
    }
}

/// One labeled failure counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureCount {
    pub category: String,
    pub detail: String,
    pub count: u64,
}

/// A point-in-time copy of the relay counters.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub invalid: u64,
    pub processed: u64,
    pub succeeded: u64,
    pub already_exists: u64,
    pub failures_published: u64,
    pub in_flight: i64,
    pub mean_latency_ms: f64,
    pub max_latency_ms: u64,
    pub failures: Vec<FailureCount>,
}
