//! Traversal counters
//!
//! - Counters only, monotonic
//! - Shared across traversals through `Arc`
//! - Relaxed atomics; exact per counter, not a consistent cut across them

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for scroll traversals
#[derive(Debug, Default)]
pub struct ScrollMetrics {
    traversals_started: AtomicU64,
    traversals_completed: AtomicU64,
    traversals_failed: AtomicU64,
    traversals_cancelled: AtomicU64,
    pages_fetched: AtomicU64,
    documents_delivered: AtomicU64,
    cursors_released: AtomicU64,
    cursor_release_failures: AtomicU64,
}

/// Point-in-time copy of [`ScrollMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub traversals_started: u64,
    pub traversals_completed: u64,
    pub traversals_failed: u64,
    pub traversals_cancelled: u64,
    pub pages_fetched: u64,
    pub documents_delivered: u64,
    pub cursors_released: u64,
    pub cursor_release_failures: u64,
}

impl ScrollMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_traversals_started(&self) {
        self.traversals_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_traversals_completed(&self) {
        self.traversals_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_traversals_failed(&self) {
        self.traversals_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_traversals_cancelled(&self) {
        self.traversals_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_pages_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_documents_delivered(&self, count: u64) {
        self.documents_delivered.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_cursors_released(&self) {
        self.cursors_released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cursor_release_failures(&self) {
        self.cursor_release_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            traversals_started: self.traversals_started.load(Ordering::Relaxed),
            traversals_completed: self.traversals_completed.load(Ordering::Relaxed),
            traversals_failed: self.traversals_failed.load(Ordering::Relaxed),
            traversals_cancelled: self.traversals_cancelled.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            documents_delivered: self.documents_delivered.load(Ordering::Relaxed),
            cursors_released: self.cursors_released.load(Ordering::Relaxed),
            cursor_release_failures: self.cursor_release_failures.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}
