//! Decision - the certifier's per-transaction outcome

use std::fmt;

use crate::identifier::Gtid;

/// Why a transaction was rejected.
///
/// None of these are fatal; the certifier stays usable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RejectKind {
    /// A write-set fingerprint was committed after the transaction's snapshot
    Conflict,
    /// The explicit GTID is already in the executed set
    Duplicate,
    /// No gno (or sidno) is left in the legal range
    Exhausted,
    /// Gno out of range, or a snapshot version from the future
    Invalid,
}

impl RejectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectKind::Conflict => "conflict",
            RejectKind::Duplicate => "duplicate",
            RejectKind::Exhausted => "exhausted",
            RejectKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for RejectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Committed under this GTID
    Accept(Gtid),
    Reject(RejectKind),
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept(_))
    }

    pub fn gtid(&self) -> Option<&Gtid> {
        match self {
            Decision::Accept(gtid) => Some(gtid),
            Decision::Reject(_) => None,
        }
    }

    pub fn reject_kind(&self) -> Option<RejectKind> {
        match self {
            Decision::Accept(_) => None,
            Decision::Reject(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accept(gtid) => write!(f, "accept({})", gtid),
            Decision::Reject(kind) => write!(f, "reject({})", kind),
        }
    }
}
