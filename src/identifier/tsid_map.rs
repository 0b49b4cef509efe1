//! TsidMap - bijection between TSIDs and sidnos
//!
//! - Sidnos are assigned densely starting at 1, in first-encounter order
//! - Sidnos are never recycled
//! - Adding an existing TSID returns its existing sidno
//!
//! # Locking
//!
//! The map carries its own reader-writer lock. Lookups share the lock;
//! registration of a new TSID takes it exclusively. The certifier registers
//! TSIDs while holding its own mutex, so the lock order is always
//! certifier mutex -> map write lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::errors::{IdentifierError, IdentifierResult};
use super::gno::Sidno;
use super::tsid::Tsid;

/// Largest sidno a map will hand out.
pub const SIDNO_MAX: u32 = i32::MAX as u32;

#[derive(Debug, Default)]
struct TsidMapInner {
    by_tsid: HashMap<Tsid, Sidno>,
    /// Indexed by `sidno - 1`.
    by_sidno: Vec<Tsid>,
}

#[derive(Debug)]
pub struct TsidMap {
    inner: RwLock<TsidMapInner>,
    limit: u32,
}

impl TsidMap {
    pub fn new() -> Self {
        Self::with_limit(SIDNO_MAX)
    }

    /// Create a map that refuses to grow beyond `limit` entries.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            inner: RwLock::new(TsidMapInner::default()),
            limit: limit.min(SIDNO_MAX),
        }
    }

    /// Register a TSID, returning its (existing or new) sidno.
    ///
    /// Fails only when the sidno space is exhausted.
    pub fn add(&self, tsid: &Tsid) -> IdentifierResult<Sidno> {
        if let Some(sidno) = self.lookup(tsid) {
            return Ok(sidno);
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have registered it between the two locks.
        if let Some(sidno) = inner.by_tsid.get(tsid) {
            return Ok(*sidno);
        }

        let count = inner.by_sidno.len() as u32;
        if count >= self.limit {
            return Err(IdentifierError::SidnoExhausted(count));
        }
        let sidno = Sidno::new(count + 1).ok_or(IdentifierError::SidnoExhausted(count))?;
        inner.by_sidno.push(tsid.clone());
        inner.by_tsid.insert(tsid.clone(), sidno);
        Ok(sidno)
    }

    /// Sidno for `tsid`, or `None` if it was never added.
    pub fn lookup(&self, tsid: &Tsid) -> Option<Sidno> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_tsid.get(tsid).copied()
    }

    /// TSID for `sidno`, or `None` if no such sidno was handed out.
    pub fn tsid(&self, sidno: Sidno) -> Option<Tsid> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_sidno.get(sidno.index()).cloned()
    }

    /// Number of registered TSIDs (equal to the largest sidno).
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_sidno.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TsidMap {
    fn default() -> Self {
        Self::new()
    }
}
