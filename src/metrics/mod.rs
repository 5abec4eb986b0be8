//! Metrics collection module
//!
//! Tracks how many requests a controller issued and what happened to their
//! responses.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters owned by one controller
#[derive(Debug, Default)]
pub struct ControllerMetrics {
    requests: AtomicU64,
    applied: AtomicU64,
    discarded: AtomicU64,
    failures: AtomicU64,
}

impl ControllerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request was sent
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A response (or failure) updated the controller state
    pub fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    /// A response arrived for a superseded request
    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ControllerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub applied: u64,
    pub discarded: u64,
    pub failures: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requests, {} applied, {} stale, {} failed",
            self.requests, self.applied, self.discarded, self.failures
        )
    }
}
