//! Gateway counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exactness per counter, not across counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry shared by the gateway, the backup worker and the HTTP layer
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests_received: AtomicU64,
    requests_committed: AtomicU64,
    requests_aborted: AtomicU64,
    requests_rejected: AtomicU64,
    reads_served: AtomicU64,
    rows_applied: AtomicU64,
    endpoints_registered: AtomicU64,
    backups_created: AtomicU64,
    backup_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_committed(&self) {
        self.requests_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_aborted(&self) {
        self.requests_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reads_served(&self) {
        self.reads_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Add rows applied by a committed batch
    pub fn add_rows_applied(&self, rows: u64) {
        self.rows_applied.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_endpoints_registered(&self) {
        self.endpoints_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_backups(&self) {
        self.backups_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_backup_failures(&self) {
        self.backup_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_committed: self.requests_committed.load(Ordering::Relaxed),
            requests_aborted: self.requests_aborted.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            reads_served: self.reads_served.load(Ordering::Relaxed),
            rows_applied: self.rows_applied.load(Ordering::Relaxed),
            endpoints_registered: self.endpoints_registered.load(Ordering::Relaxed),
            backups_created: self.backups_created.load(Ordering::Relaxed),
            backup_failures: self.backup_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub requests_committed: u64,
    pub requests_aborted: u64,
    pub requests_rejected: u64,
    pub reads_served: u64,
    pub rows_applied: u64,
    pub endpoints_registered: u64,
    pub backups_created: u64,
    pub backup_failures: u64,
}
