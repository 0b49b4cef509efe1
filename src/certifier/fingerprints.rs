//! Fingerprint table: fingerprint -> version of its last committed write
//!
//! A transaction conflicts when any fingerprint it writes was committed at a
//! version strictly greater than its snapshot version.

use std::collections::HashMap;

use super::transaction::Fingerprint;

#[derive(Debug, Default)]
pub(crate) struct FingerprintTable {
    last_committed: HashMap<Fingerprint, u64>,
}

impl FingerprintTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True if any of `write_set` was committed after `snapshot_version`.
    pub(crate) fn conflicts(&self, write_set: &[Fingerprint], snapshot_version: u64) -> bool {
        write_set.iter().any(|fingerprint| {
            self.last_committed
                .get(fingerprint)
                .map_or(false, |&version| version > snapshot_version)
        })
    }

    /// Record `write_set` as committed at `version`.
    pub(crate) fn record(&mut self, write_set: &[Fingerprint], version: u64) {
        for fingerprint in write_set {
            self.last_committed.insert(*fingerprint, version);
        }
    }

    /// Drop entries older than `oldest_live`. Returns how many were removed.
    ///
    /// An entry at version `v < oldest_live` cannot exceed any live snapshot.
    pub(crate) fn prune_older_than(&mut self, oldest_live: u64) -> usize {
        let before = self.last_committed.len();
        self.last_committed.retain(|_, version| *version >= oldest_live);
        before - self.last_committed.len()
    }

    pub(crate) fn last_committed(&self, fingerprint: &Fingerprint) -> Option<u64> {
        self.last_committed.get(fingerprint).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.last_committed.len()
    }
}
