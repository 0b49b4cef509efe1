//! Collaborator interfaces supplied by the caller
//!
//! - `SnapshotHorizon` reports the oldest snapshot version still in use, which
//!   bounds fingerprint-table pruning
//! - `MonotonicClock` times certification for metrics only

use std::time::Instant;

/// Source of the oldest live snapshot version across active transactions.
pub trait SnapshotHorizon: Send + Sync {
    /// `None` when the coordinator cannot tell; nothing is pruned then.
    fn oldest_live_snapshot_version(&self) -> Option<u64>;
}

impl<F> SnapshotHorizon for F
where
    F: Fn() -> Option<u64> + Send + Sync,
{
    fn oldest_live_snapshot_version(&self) -> Option<u64> {
        self()
    }
}

/// Horizon that never allows pruning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverPrune;

impl SnapshotHorizon for NeverPrune {
    fn oldest_live_snapshot_version(&self) -> Option<u64> {
        None
    }
}

pub trait MonotonicClock: Send + Sync {
    fn now(&self) -> Instant;
}

/// `Instant::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl MonotonicClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
