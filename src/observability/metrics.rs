//! Metrics registry for the certifier
//!
//! - Counters only, monotonic, reset only on process start
//! - Thread-safe, lock-free (Relaxed atomics)
//! - Updated from inside the certifier critical section, read from anywhere

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Transactions that entered certification
    transactions_checked: AtomicU64,
    /// Accepted transactions
    transactions_accepted: AtomicU64,
    /// Rejections by kind
    conflicts_detected: AtomicU64,
    duplicates_rejected: AtomicU64,
    exhausted_rejected: AtomicU64,
    invalid_rejected: AtomicU64,
    /// Gnos minted by the generator
    gnos_allocated: AtomicU64,
    /// Blocks reserved by the generator
    block_refills: AtomicU64,
    /// Fingerprint-table prune passes
    prune_runs: AtomicU64,
    /// Fingerprint entries removed by pruning
    fingerprints_pruned: AtomicU64,
    /// Cumulative time spent certifying, nanoseconds
    certify_nanos: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_checked(&self) {
        self.transactions_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_accepted(&self) {
        self.transactions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.conflicts_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_exhausted(&self) {
        self.exhausted_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_invalid(&self) {
        self.invalid_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gnos_allocated(&self) {
        self.gnos_allocated.fetch_add(1, Ordering::Relaxed);
    }

    /// Block refills are counted by the generator; the registry mirrors its total.
    pub fn set_block_refills(&self, total: u64) {
        self.block_refills.store(total, Ordering::Relaxed);
    }

    pub fn record_prune(&self, removed: u64) {
        self.prune_runs.fetch_add(1, Ordering::Relaxed);
        self.fingerprints_pruned.fetch_add(removed, Ordering::Relaxed);
    }

    pub fn add_certify_nanos(&self, nanos: u64) {
        self.certify_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn transactions_checked(&self) -> u64 {
        self.transactions_checked.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            transactions_checked: self.transactions_checked.load(Ordering::Relaxed),
            transactions_accepted: self.transactions_accepted.load(Ordering::Relaxed),
            conflicts_detected: self.conflicts_detected.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            exhausted_rejected: self.exhausted_rejected.load(Ordering::Relaxed),
            invalid_rejected: self.invalid_rejected.load(Ordering::Relaxed),
            gnos_allocated: self.gnos_allocated.load(Ordering::Relaxed),
            block_refills: self.block_refills.load(Ordering::Relaxed),
            prune_runs: self.prune_runs.load(Ordering::Relaxed),
            fingerprints_pruned: self.fingerprints_pruned.load(Ordering::Relaxed),
            certify_nanos: self.certify_nanos.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub transactions_checked: u64,
    pub transactions_accepted: u64,
    pub conflicts_detected: u64,
    pub duplicates_rejected: u64,
    pub exhausted_rejected: u64,
    pub invalid_rejected: u64,
    pub gnos_allocated: u64,
    pub block_refills: u64,
    pub prune_runs: u64,
    pub fingerprints_pruned: u64,
    pub certify_nanos: u64,
}

impl MetricsSnapshot {
    /// Rejections of every kind.
    pub fn transactions_rejected(&self) -> u64 {
        self.conflicts_detected
            + self.duplicates_rejected
            + self.exhausted_rejected
            + self.invalid_rejected
    }
}
