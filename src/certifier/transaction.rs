//! Transaction - the certifier's unit of input
//!
//! A transaction arrives in total order carrying:
//! - the originating member's UUID
//! - a requested identity: an explicit GTID, or a TSID to mint a gno under
//! - a write-set of opaque fingerprints
//! - the version of the executed set it read from

use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::identifier::{Gno, Tsid};

/// Opaque identity of a row or key touched by a transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Derive a fingerprint from raw key bytes (first 8 bytes of SHA-256).
    pub fn from_key(key: &[u8]) -> Self {
        let digest = Sha256::digest(key);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Fingerprint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Identity a transaction asks to commit under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestedIdentity {
    /// The transaction already carries its gno (remote or replayed).
    Explicit { tsid: Tsid, gno: Gno },
    /// The certifier mints the next gno under `tsid`.
    Automatic { tsid: Tsid },
}

impl RequestedIdentity {
    pub fn tsid(&self) -> &Tsid {
        match self {
            RequestedIdentity::Explicit { tsid, .. } => tsid,
            RequestedIdentity::Automatic { tsid } => tsid,
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, RequestedIdentity::Automatic { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub originator: Uuid,
    pub identity: RequestedIdentity,
    pub write_set: Vec<Fingerprint>,
    pub snapshot_version: u64,
}

impl Transaction {
    /// Transaction whose gno is minted by the certifier.
    pub fn automatic(originator: Uuid, tsid: Tsid, snapshot_version: u64) -> Self {
        Self {
            originator,
            identity: RequestedIdentity::Automatic { tsid },
            write_set: Vec::new(),
            snapshot_version,
        }
    }

    /// Transaction carrying its own gno.
    pub fn explicit(originator: Uuid, tsid: Tsid, gno: Gno, snapshot_version: u64) -> Self {
        Self {
            originator,
            identity: RequestedIdentity::Explicit { tsid, gno },
            write_set: Vec::new(),
            snapshot_version,
        }
    }

    /// Replace the write-set.
    pub fn with_write_set<I>(mut self, fingerprints: I) -> Self
    where
        I: IntoIterator<Item = Fingerprint>,
    {
        self.write_set = fingerprints.into_iter().collect();
        self
    }
}
