//! Sequence numbers, sidnos and intervals
//!
//! - `Gno` is a signed 64-bit sequence number, legal in [1, 2^63 - 2]
//! - `Sidno` is the dense process-local alias of a TSID, never 0
//! - `Interval` is a non-empty half-open range of gnos

use std::fmt;

use super::errors::{IdentifierError, IdentifierResult};

/// Per-sidno transaction sequence number.
pub type Gno = i64;

/// Smallest legal gno.
pub const GNO_FIRST: Gno = 1;

/// Largest legal gno (2^63 - 2).
pub const GNO_MAX: Gno = i64::MAX - 1;

/// Exclusive upper bound of the legal gno range (2^63 - 1).
pub const GNO_END: Gno = i64::MAX;

/// Returns true if `gno` is in [GNO_FIRST, GNO_MAX].
#[inline]
pub fn is_valid_gno(gno: Gno) -> bool {
    (GNO_FIRST..GNO_END).contains(&gno)
}

/// Check that `gno` is in range.
pub fn check_gno(gno: Gno) -> IdentifierResult<Gno> {
    if is_valid_gno(gno) {
        Ok(gno)
    } else {
        Err(IdentifierError::GnoOutOfRange(gno))
    }
}

/// Dense, process-local handle for a TSID.
///
/// Sidnos are assigned by `TsidMap` starting at 1 and are never recycled.
/// Sidno 0 is reserved and cannot be constructed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Sidno(u32);

impl Sidno {
    /// Create a sidno. Returns `None` for the reserved value 0.
    #[inline]
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based slot for sidno-indexed storage.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for Sidno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open gno interval `[lo, hi)`.
///
/// Always non-empty and within the legal gno range:
/// `GNO_FIRST <= lo < hi <= GNO_END`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Interval {
    lo: Gno,
    hi: Gno,
}

impl Interval {
    /// Create an interval, validating its bounds.
    pub fn new(lo: Gno, hi: Gno) -> IdentifierResult<Self> {
        if lo < GNO_FIRST || hi > GNO_END || lo >= hi {
            return Err(IdentifierError::InvalidInterval { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Create the single-gno interval `[gno, gno + 1)`.
    pub fn single(gno: Gno) -> IdentifierResult<Self> {
        check_gno(gno)?;
        Ok(Self { lo: gno, hi: gno + 1 })
    }

    /// Internal constructor for bounds already known to be valid.
    #[inline]
    pub(crate) fn new_unchecked(lo: Gno, hi: Gno) -> Self {
        debug_assert!(lo >= GNO_FIRST && lo < hi && hi <= GNO_END);
        Self { lo, hi }
    }

    /// Inclusive lower bound.
    #[inline]
    pub fn lo(&self) -> Gno {
        self.lo
    }

    /// Exclusive upper bound.
    #[inline]
    pub fn hi(&self) -> Gno {
        self.hi
    }

    /// Number of gnos in the interval.
    #[inline]
    pub fn len(&self) -> u64 {
        (self.hi - self.lo) as u64
    }

    /// Intervals are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, gno: Gno) -> bool {
        self.lo <= gno && gno < self.hi
    }
}

/// Inclusive text form: `lo` or `lo-last`.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hi - self.lo == 1 {
            write!(f, "{}", self.lo)
        } else {
            write!(f, "{}-{}", self.lo, self.hi - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gno_range_bounds() {
        assert!(!is_valid_gno(0));
        assert!(!is_valid_gno(-1));
        assert!(is_valid_gno(1));
        assert!(is_valid_gno(9_223_372_036_854_775_806));
        assert!(!is_valid_gno(9_223_372_036_854_775_807));
        assert_eq!(GNO_MAX, 9_223_372_036_854_775_806);
    }

    #[test]
    fn test_check_gno_rejects_out_of_range() {
        assert_eq!(check_gno(0), Err(IdentifierError::GnoOutOfRange(0)));
        assert_eq!(check_gno(GNO_END), Err(IdentifierError::GnoOutOfRange(GNO_END)));
        assert_eq!(check_gno(42), Ok(42));
    }

    #[test]
    fn test_sidno_zero_is_reserved() {
        assert!(Sidno::new(0).is_none());
        let sidno = Sidno::new(3).unwrap();
        assert_eq!(sidno.value(), 3);
        assert_eq!(sidno.index(), 2);
    }

    #[test]
    fn test_interval_validation() {
        assert!(Interval::new(1, 2).is_ok());
        assert!(Interval::new(0, 2).is_err());
        assert!(Interval::new(5, 5).is_err());
        assert!(Interval::new(6, 5).is_err());
        assert!(Interval::new(1, GNO_END).is_ok());
        assert!(Interval::single(GNO_MAX).is_ok());
        assert!(Interval::single(GNO_END).is_err());
    }

    #[test]
    fn test_interval_display_is_inclusive() {
        assert_eq!(Interval::new(1, 2).unwrap().to_string(), "1");
        assert_eq!(Interval::new(1, 101).unwrap().to_string(), "1-100");
    }

    #[test]
    fn test_interval_contains() {
        let iv = Interval::new(10, 20).unwrap();
        assert!(!iv.contains(9));
        assert!(iv.contains(10));
        assert!(iv.contains(19));
        assert!(!iv.contains(20));
        assert_eq!(iv.len(), 10);
    }
}
