//! Request counters
//!
//! Counters only, monotonic, reset on process start. Relaxed atomics: the
//! counters are independent and read only for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    pages_served: AtomicU64,
    words_returned: AtomicU64,
    sampled_pages: AtomicU64,
    queries_rejected: AtomicU64,
    features_unavailable: AtomicU64,
    store_failures: AtomicU64,
    decode_failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page returned to a caller
    pub fn record_page(&self, words: usize, sampled: bool) {
        self.pages_served.fetch_add(1, Ordering::Relaxed);
        self.words_returned.fetch_add(words as u64, Ordering::Relaxed);
        if sampled {
            self.sampled_pages.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_features_unavailable(&self) {
        self.features_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_served(&self) -> u64 {
        self.pages_served.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_served: self.pages_served.load(Ordering::Relaxed),
            words_returned: self.words_returned.load(Ordering::Relaxed),
            sampled_pages: self.sampled_pages.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            features_unavailable: self.features_unavailable.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub pages_served: u64,
    pub words_returned: u64,
    pub sampled_pages: u64,
    pub queries_rejected: u64,
    pub features_unavailable: u64,
    pub store_failures: u64,
    pub decode_failures: u64,
}
