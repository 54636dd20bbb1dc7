//! Metrics collection module
//!
//! Tracks search volume, upstream failures and translation outcomes.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Number of response times kept for the rolling average
const RESPONSE_WINDOW: usize = 100;

/// In-process metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    total_searches: AtomicU64,
    upstream_failures: AtomicU64,
    translation_failures: AtomicU64,
    entries_emitted: AtomicU64,
    records_skipped: AtomicU64,
    response_times: RwLock<Vec<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation_failure(&self) {
        self.translation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a translated page: entries written and records dropped
    pub fn record_translation(&self, emitted: usize, skipped: usize) {
        self.entries_emitted
            .fetch_add(emitted as u64, Ordering::Relaxed);
        self.records_skipped
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    /// Record an end-to-end response time
    pub fn record_response_time(&self, time_ms: u64) {
        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(|e| e.into_inner());

        if times.len() >= RESPONSE_WINDOW {
            times.remove(0);
        }
        times.push(time_ms);
    }

    /// Average of the recent response times
    pub fn avg_response_time(&self) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(|e| e.into_inner());
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_searches: self.total_searches.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            translation_failures: self.translation_failures.load(Ordering::Relaxed),
            entries_emitted: self.entries_emitted.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            avg_response_time_ms: self.avg_response_time(),
        }
    }
}

/// Point-in-time view of the metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub upstream_failures: u64,
    pub translation_failures: u64,
    pub entries_emitted: u64,
    pub records_skipped: u64,
    pub avg_response_time_ms: Option<u64>,
}
