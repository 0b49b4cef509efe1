//! GtidGenerator - per-sidno block allocator
//!
//! Allocation for a sidno:
//! 1. Materialise the block lazily just above the largest executed gno;
//!    `recompute` instead positions every block at its sidno's first gap
//! 2. If the block is used up, or the executed set has since gained its next
//!    gno, reserve a new block starting at the first free gno from there:
//!    `block_end = min(start + block_size, start of next executed interval)`
//! 3. Hand out `next_free` and advance it
//!
//! The generator never writes to the executed set. The caller publishes the
//! returned gno under the same critical section.

use std::collections::HashMap;

use uuid::Uuid;

use super::errors::{GeneratorError, GeneratorResult};
use crate::identifier::{Gno, GtidSet, Sidno, GNO_END, GNO_FIRST, GNO_MAX};
use crate::observability::{log_event_with_fields, Event};

/// Gnos reserved per refill when not configured.
pub const DEFAULT_BLOCK_SIZE: u64 = 1000;

/// Reserved range `[next_free, block_end)` for one sidno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedBlock {
    next_free: Gno,
    block_end: Gno,
}

impl ReservedBlock {
    /// Empty block positioned at `start`; the next allocation refills it.
    fn empty_at(start: Gno) -> Self {
        Self {
            next_free: start,
            block_end: start,
        }
    }

    pub fn next_free(&self) -> Gno {
        self.next_free
    }

    pub fn block_end(&self) -> Gno {
        self.block_end
    }

    /// Gnos still available without a refill.
    pub fn remaining(&self) -> u64 {
        (self.block_end - self.next_free) as u64
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_free >= self.block_end
    }
}

#[derive(Debug)]
pub struct GtidGenerator {
    block_size: Gno,
    blocks: HashMap<Sidno, ReservedBlock>,
    refills: u64,
}

impl GtidGenerator {
    /// Create a generator reserving `block_size` gnos per refill.
    pub fn initialize(block_size: u64) -> GeneratorResult<Self> {
        if block_size == 0 {
            return Err(GeneratorError::ZeroBlockSize);
        }
        Ok(Self {
            block_size: block_size.min(GNO_MAX as u64) as Gno,
            blocks: HashMap::new(),
            refills: 0,
        })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size as u64
    }

    /// Reset every block against `executed`.
    ///
    /// Must not run concurrently with `next`; the certifier holds its mutex.
    pub fn recompute(&mut self, executed: &GtidSet) {
        self.blocks.clear();
        for sidno in executed.sidnos() {
            let start = executed.next_free(sidno, GNO_FIRST);
            self.blocks.insert(sidno, ReservedBlock::empty_at(start));
        }
    }

    /// Next gno for `sidno` that is not in `executed`.
    ///
    /// `originator` is only reported in the block-reservation trace. On
    /// exhaustion the generator state is left exactly as it was.
    pub fn next(
        &mut self,
        originator: &Uuid,
        sidno: Sidno,
        executed: &GtidSet,
    ) -> GeneratorResult<Gno> {
        let mut block = match self.blocks.get(&sidno) {
            Some(block) => *block,
            None => ReservedBlock::empty_at(executed.max_gno(sidno).max(0) + 1),
        };

        if block.is_exhausted() || executed.contains(sidno, block.next_free) {
            block = self.reserve(originator, sidno, block.next_free, executed)?;
        }

        let gno = block.next_free;
        block.next_free += 1;
        self.blocks.insert(sidno, block);
        Ok(gno)
    }

    /// Reserve a block starting at the first free gno `>= from`.
    fn reserve(
        &mut self,
        originator: &Uuid,
        sidno: Sidno,
        from: Gno,
        executed: &GtidSet,
    ) -> GeneratorResult<ReservedBlock> {
        let start = executed.next_free(sidno, from);
        if start >= GNO_END {
            log_event_with_fields(
                Event::GnoExhausted,
                &[
                    ("sidno", sidno.to_string().as_str()),
                    ("originator", originator.to_string().as_str()),
                ],
            );
            return Err(GeneratorError::Exhausted { sidno });
        }

        let mut block_end = start.saturating_add(self.block_size).min(GNO_END);
        if let Some(next_lo) = executed.next_interval_start(sidno, start) {
            block_end = block_end.min(next_lo);
        }

        self.refills += 1;
        log_event_with_fields(
            Event::BlockReserved,
            &[
                ("sidno", sidno.to_string().as_str()),
                ("originator", originator.to_string().as_str()),
                ("next_free", start.to_string().as_str()),
                ("block_end", block_end.to_string().as_str()),
            ],
        );

        Ok(ReservedBlock {
            next_free: start,
            block_end,
        })
    }

    /// Current block for `sidno`, if one was ever materialised.
    pub fn reserved_block(&self, sidno: Sidno) -> Option<ReservedBlock> {
        self.blocks.get(&sidno).copied()
    }

    /// Number of blocks reserved since creation.
    pub fn refill_count(&self) -> u64 {
        self.refills
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidno(n: u32) -> Sidno {
        Sidno::new(n).unwrap()
    }

    fn member(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    /// Allocate `count` gnos, publishing each like the certifier does.
    fn allocate(
        generator: &mut GtidGenerator,
        executed: &mut GtidSet,
        s: Sidno,
        count: usize,
    ) -> Vec<Gno> {
        (0..count)
            .map(|_| {
                let gno = generator.next(&member(1), s, executed).unwrap();
                assert!(executed.add(s, gno).unwrap());
                gno
            })
            .collect()
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert_eq!(
            GtidGenerator::initialize(0).unwrap_err(),
            GeneratorError::ZeroBlockSize
        );
    }

    #[test]
    fn test_gap_free_from_empty_set() {
        for block_size in [1, 3, 1000] {
            let mut generator = GtidGenerator::initialize(block_size).unwrap();
            let mut executed = GtidSet::new();
            let gnos = allocate(&mut generator, &mut executed, sidno(1), 25);
            assert_eq!(gnos, (1..=25).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_block_refill_count() {
        let mut generator = GtidGenerator::initialize(10).unwrap();
        let mut executed = GtidSet::new();
        allocate(&mut generator, &mut executed, sidno(1), 25);
        assert_eq!(generator.refill_count(), 3);

        let block = generator.reserved_block(sidno(1)).unwrap();
        assert_eq!(block.next_free(), 26);
        assert_eq!(block.block_end(), 31);
        assert_eq!(block.remaining(), 5);
    }

    #[test]
    fn test_first_use_starts_above_max_gno() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(1), 1, 101).unwrap();
        executed.add_range(sidno(1), 200, 251).unwrap();

        assert_eq!(generator.next(&member(1), sidno(1), &executed).unwrap(), 251);
        let block = generator.reserved_block(sidno(1)).unwrap();
        assert_eq!(block.next_free(), 252);
        assert_eq!(block.block_end(), 1251);
    }

    #[test]
    fn test_first_use_after_single_explicit_gno() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add(sidno(1), 5).unwrap();

        let gnos = allocate(&mut generator, &mut executed, sidno(1), 2);
        assert_eq!(gnos, vec![6, 7]);
    }

    #[test]
    fn test_block_stops_at_next_interval() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(1), 1, 101).unwrap();
        executed.add_range(sidno(1), 200, 251).unwrap();
        generator.recompute(&executed);

        assert_eq!(generator.next(&member(1), sidno(1), &executed).unwrap(), 101);
        let block = generator.reserved_block(sidno(1)).unwrap();
        assert_eq!(block.block_end(), 200);
    }

    #[test]
    fn test_skips_over_executed_intervals() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(1), 3, 5).unwrap();
        generator.recompute(&executed);

        let gnos = allocate(&mut generator, &mut executed, sidno(1), 4);
        assert_eq!(gnos, vec![1, 2, 5, 6]);
    }

    #[test]
    fn test_gno_added_inside_block_is_skipped() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        allocate(&mut generator, &mut executed, sidno(1), 2);

        // A remote transaction brings its own gno inside the reserved block.
        executed.add(sidno(1), 3).unwrap();

        let next = generator.next(&member(1), sidno(1), &executed).unwrap();
        assert_eq!(next, 4);
    }

    #[test]
    fn test_originator_does_not_partition() {
        let mut generator = GtidGenerator::initialize(10).unwrap();
        let mut executed = GtidSet::new();
        let mut gnos = Vec::new();
        for i in 0..30u8 {
            let gno = generator.next(&member(i % 2), sidno(1), &executed).unwrap();
            executed.add(sidno(1), gno).unwrap();
            gnos.push(gno);
        }
        assert_eq!(gnos, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_sidnos_are_independent() {
        let mut generator = GtidGenerator::initialize(5).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(2), 1, 51).unwrap();

        assert_eq!(generator.next(&member(1), sidno(1), &executed).unwrap(), 1);
        assert_eq!(generator.next(&member(1), sidno(2), &executed).unwrap(), 51);
    }

    #[test]
    fn test_exhaustion_leaves_state_unchanged() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(1), 1, GNO_END).unwrap();

        let first = generator.next(&member(1), sidno(1), &executed);
        assert_eq!(first, Err(GeneratorError::Exhausted { sidno: sidno(1) }));
        assert!(generator.reserved_block(sidno(1)).is_none());
        assert_eq!(generator.refill_count(), 0);

        let second = generator.next(&member(1), sidno(1), &executed);
        assert_eq!(second, first);
    }

    #[test]
    fn test_last_legal_gno_then_exhaustion() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        executed.add_range(sidno(1), 1, GNO_MAX).unwrap();

        let gno = generator.next(&member(1), sidno(1), &executed).unwrap();
        assert_eq!(gno, GNO_MAX);
        executed.add(sidno(1), gno).unwrap();

        let before = generator.reserved_block(sidno(1));
        assert!(generator.next(&member(1), sidno(1), &executed).is_err());
        assert_eq!(generator.reserved_block(sidno(1)), before);
    }

    #[test]
    fn test_recompute_restarts_at_first_gap() {
        let mut generator = GtidGenerator::initialize(1000).unwrap();
        let mut executed = GtidSet::new();
        allocate(&mut generator, &mut executed, sidno(1), 5);

        let mut recovered = GtidSet::new();
        recovered.add_range(sidno(1), 1, 101).unwrap();
        recovered.add_range(sidno(1), 200, 251).unwrap();
        generator.recompute(&recovered);

        let block = generator.reserved_block(sidno(1)).unwrap();
        assert_eq!(block.next_free(), 101);
        assert!(block.is_exhausted());
        assert_eq!(generator.next(&member(1), sidno(1), &recovered).unwrap(), 101);
    }

    #[test]
    fn test_huge_block_size_is_clamped() {
        let mut generator = GtidGenerator::initialize(u64::MAX).unwrap();
        assert_eq!(generator.block_size(), GNO_MAX as u64);
        let executed = GtidSet::new();
        assert_eq!(generator.next(&member(1), sidno(1), &executed).unwrap(), 1);
        assert_eq!(generator.reserved_block(sidno(1)).unwrap().block_end(), GNO_END);
    }
}
