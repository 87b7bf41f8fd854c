//! Process-wide query outcome counters
//!
//! The counters live for the lifetime of the process and reset only on
//! restart. Increments are atomic; `snapshot` reads the two counters
//! independently, which is acceptable staleness for a monitoring signal.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::MonitoringSnapshot;

/// Success/failure tally updated by every query
#[derive(Debug, Default)]
pub struct QueryMonitor {
    success_count: AtomicU64,
    failure_count: AtomicU64,
}

impl QueryMonitor {
    /// Create a new monitor with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one query outcome, incrementing exactly one counter
    pub fn record_outcome(&self, success: bool) {
        if success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }

        tracing::debug!(
            success_count = self.success_count.load(Ordering::Relaxed),
            failure_count = self.failure_count.load(Ordering::Relaxed),
            "query outcome recorded"
        );
    }

    /// Read the current counters. The two loads are independent; they are
    /// not a single atomic pair.
    pub fn snapshot(&self) -> MonitoringSnapshot {
        MonitoringSnapshot {
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
        }
    }
}
