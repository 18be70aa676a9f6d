//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatch session
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Records acknowledged by the store (ack == true)
    saved_count: AtomicU64,
    /// Records the store answered with a negative acknowledgement
    nacked_count: AtomicU64,
    /// Submissions that failed with an error
    failure_count: AtomicU64,
    /// Batches fully settled
    batch_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get saved count
    pub fn saved_count(&self) -> u64 {
        self.saved_count.load(Ordering::Relaxed)
    }

    /// Increment saved count
    pub fn inc_saved_count(&self) {
        self.saved_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get negative acknowledgement count
    pub fn nacked_count(&self) -> u64 {
        self.nacked_count.load(Ordering::Relaxed)
    }

    /// Increment negative acknowledgement count
    pub fn inc_nacked_count(&self) {
        self.nacked_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get settled batch count
    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    /// Increment settled batch count
    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            saved_count: self.saved_count(),
            nacked_count: self.nacked_count(),
            failure_count: self.failure_count(),
            batch_count: self.batch_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchSnapshot {
    pub saved_count: u64,
    pub nacked_count: u64,
    pub failure_count: u64,
    pub batch_count: u64,
}
