//! GtidSet - the executed set
//!
//! Maps each sidno to an ordered set of non-overlapping half-open gno
//! intervals `[lo, hi)`.
//!
//! Invariants (maintained by every mutating operation):
//! - Intervals are non-empty and within [1, 2^63 - 1)
//! - Intervals are disjoint and sorted by `lo`
//! - Intervals are maximally coalesced: no interval ends where the next begins
//!
//! Intervals for one sidno live in a `BTreeMap<lo, hi>`, so point lookups and
//! insertions are O(log k) in the number of intervals k.
//!
//! The set has no internal lock. The certifier owns it and mediates all access.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::errors::IdentifierResult;
use super::gno::{check_gno, Gno, Interval, Sidno, GNO_END, GNO_FIRST};

#[derive(Debug, Clone, Default)]
pub struct GtidSet {
    /// Indexed by `sidno - 1`.
    sidnos: Vec<BTreeMap<Gno, Gno>>,
}

impl GtidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the set ready to hold intervals for `sidno`. Idempotent.
    pub fn ensure_sidno(&mut self, sidno: Sidno) {
        let needed = sidno.index() + 1;
        if self.sidnos.len() < needed {
            self.sidnos.resize_with(needed, BTreeMap::new);
        }
    }

    fn slot(&self, sidno: Sidno) -> Option<&BTreeMap<Gno, Gno>> {
        self.sidnos.get(sidno.index())
    }

    fn slot_mut(&mut self, sidno: Sidno) -> &mut BTreeMap<Gno, Gno> {
        self.ensure_sidno(sidno);
        &mut self.sidnos[sidno.index()]
    }

    /// The interval containing `gno`, if any.
    fn enclosing(&self, sidno: Sidno, gno: Gno) -> Option<Interval> {
        let (&lo, &hi) = self.slot(sidno)?.range(..=gno).next_back()?;
        if gno < hi {
            Some(Interval::new_unchecked(lo, hi))
        } else {
            None
        }
    }

    pub fn contains(&self, sidno: Sidno, gno: Gno) -> bool {
        self.enclosing(sidno, gno).is_some()
    }

    /// Insert one gno, coalescing with its neighbours.
    ///
    /// Returns `Ok(true)` if the gno was newly inserted and `Ok(false)` if it
    /// was already present.
    pub fn add(&mut self, sidno: Sidno, gno: Gno) -> IdentifierResult<bool> {
        check_gno(gno)?;
        let intervals = self.slot_mut(sidno);

        let left = intervals.range(..=gno).next_back().map(|(&lo, &hi)| (lo, hi));
        if let Some((_, hi)) = left {
            if gno < hi {
                return Ok(false);
            }
        }

        let joins_left = matches!(left, Some((_, hi)) if hi == gno);
        let right_hi = intervals.get(&(gno + 1)).copied();

        match (left, joins_left, right_hi) {
            (Some((lo, _)), true, Some(hi)) => {
                intervals.remove(&(gno + 1));
                intervals.insert(lo, hi);
            }
            (Some((lo, _)), true, None) => {
                intervals.insert(lo, gno + 1);
            }
            (_, false, Some(hi)) => {
                intervals.remove(&(gno + 1));
                intervals.insert(gno, hi);
            }
            _ => {
                intervals.insert(gno, gno + 1);
            }
        }
        Ok(true)
    }

    /// Insert the half-open range `[lo, hi)`. An empty range is a no-op.
    pub fn add_range(&mut self, sidno: Sidno, lo: Gno, hi: Gno) -> IdentifierResult<()> {
        if lo == hi && lo >= GNO_FIRST && hi <= GNO_END {
            return Ok(());
        }
        let interval = Interval::new(lo, hi)?;
        self.add_interval(sidno, interval);
        Ok(())
    }

    /// Insert a validated interval.
    pub fn add_interval(&mut self, sidno: Sidno, interval: Interval) {
        let intervals = self.slot_mut(sidno);
        let mut new_lo = interval.lo();
        let mut new_hi = interval.hi();

        // A left neighbour that overlaps or touches absorbs the new start.
        if let Some((&lo, &hi)) = intervals.range(..=new_lo).next_back() {
            if hi >= new_lo {
                new_lo = lo;
                new_hi = new_hi.max(hi);
            }
        }

        // Every interval starting inside [new_lo, new_hi] overlaps or touches.
        let absorbed: Vec<(Gno, Gno)> = intervals
            .range(new_lo..=new_hi)
            .map(|(&lo, &hi)| (lo, hi))
            .collect();
        for (lo, hi) in absorbed {
            new_hi = new_hi.max(hi);
            intervals.remove(&lo);
        }

        intervals.insert(new_lo, new_hi);
    }

    /// Union `other` into this set.
    pub fn add_set(&mut self, other: &GtidSet) {
        for sidno in other.sidnos() {
            for interval in other.intervals(sidno) {
                self.add_interval(sidno, interval);
            }
        }
    }

    /// Largest gno recorded for `sidno`, or 0 if none.
    pub fn max_gno(&self, sidno: Sidno) -> Gno {
        self.slot(sidno)
            .and_then(|intervals| intervals.values().next_back())
            .map(|hi| hi - 1)
            .unwrap_or(0)
    }

    /// Smallest gno `>= from` (and `>= 1`) that is not in the set.
    ///
    /// Returns `GNO_END` when every legal gno from there on is taken.
    pub fn next_free(&self, sidno: Sidno, from: Gno) -> Gno {
        let from = from.max(GNO_FIRST);
        if from >= GNO_END {
            return GNO_END;
        }
        match self.enclosing(sidno, from) {
            // Coalescing guarantees `hi` itself is free.
            Some(interval) => interval.hi(),
            None => from,
        }
    }

    /// Start of the first interval beginning strictly after `after`.
    pub fn next_interval_start(&self, sidno: Sidno, after: Gno) -> Option<Gno> {
        self.slot(sidno)?
            .range((Bound::Excluded(after), Bound::Unbounded))
            .next()
            .map(|(&lo, _)| lo)
    }

    /// Intervals for `sidno` in ascending order.
    pub fn intervals(&self, sidno: Sidno) -> impl Iterator<Item = Interval> + '_ {
        self.slot(sidno)
            .into_iter()
            .flat_map(|intervals| intervals.iter())
            .map(|(&lo, &hi)| Interval::new_unchecked(lo, hi))
    }

    /// Sidnos that hold at least one gno, ascending.
    pub fn sidnos(&self) -> impl Iterator<Item = Sidno> + '_ {
        self.sidnos
            .iter()
            .enumerate()
            .filter(|(_, intervals)| !intervals.is_empty())
            .filter_map(|(index, _)| Sidno::new(index as u32 + 1))
    }

    /// Number of gnos recorded for `sidno`.
    pub fn count(&self, sidno: Sidno) -> u64 {
        self.intervals(sidno).map(|interval| interval.len()).sum()
    }

    /// Total number of gnos across all sidnos.
    pub fn len(&self) -> u64 {
        self.sidnos().map(|sidno| self.count(sidno)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sidnos.iter().all(|intervals| intervals.is_empty())
    }

    /// True if every gno of `self` is also in `other`.
    pub fn is_subset(&self, other: &GtidSet) -> bool {
        self.sidnos().all(|sidno| {
            self.intervals(sidno).all(|interval| {
                other
                    .enclosing(sidno, interval.lo())
                    .map_or(false, |outer| outer.hi() >= interval.hi())
            })
        })
    }

    /// Structural equality: same sidnos holding the same intervals.
    ///
    /// A sidno that was ensured but holds nothing compares equal to an absent one.
    pub fn equals(&self, other: &GtidSet) -> bool {
        let width = self.sidnos.len().max(other.sidnos.len());
        (0..width).all(|index| {
            match (self.sidnos.get(index), other.sidnos.get(index)) {
                (Some(a), Some(b)) => a == b,
                (Some(a), None) => a.is_empty(),
                (None, Some(b)) => b.is_empty(),
                (None, None) => true,
            }
        })
    }
}

impl PartialEq for GtidSet {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for GtidSet {}
