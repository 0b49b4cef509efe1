//! Generator Allocation Tests
//!
//! Block allocation against an executed set the caller owns:
//! - Blocks never cover executed gnos
//! - Exhaustion is reported without state change
//! - Recompute realigns every sidno to its first gap

use gtidcert::generator::{GeneratorError, GtidGenerator, DEFAULT_BLOCK_SIZE};
use gtidcert::identifier::{GtidSet, Sidno, GNO_END, GNO_MAX};
use uuid::Uuid;

fn sidno(value: u32) -> Sidno {
    Sidno::new(value).unwrap()
}

/// Allocate and publish, as the certifier does.
fn allocate(generator: &mut GtidGenerator, executed: &mut GtidSet, s: Sidno) -> i64 {
    let gno = generator.next(&Uuid::nil(), s, executed).unwrap();
    assert!(executed.add(s, gno).unwrap(), "gno {} handed out twice", gno);
    gno
}

// =============================================================================
// Initialization Tests
// =============================================================================

/// Zero block size is a configuration error.
#[test]
fn test_zero_block_size_rejected() {
    assert_eq!(
        GtidGenerator::initialize(0).unwrap_err(),
        GeneratorError::ZeroBlockSize
    );
}

/// Default block size is 1000.
#[test]
fn test_default_block_size() {
    let generator = GtidGenerator::initialize(DEFAULT_BLOCK_SIZE).unwrap();
    assert_eq!(generator.block_size(), 1000);
}

// =============================================================================
// Block Reservation Tests
// =============================================================================

/// A fresh sidno starts at 1 and reserves one block.
#[test]
fn test_fresh_sidno_starts_at_one() {
    let mut generator = GtidGenerator::initialize(10).unwrap();
    let mut executed = GtidSet::new();

    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 1);
    let block = generator.reserved_block(sidno(1)).unwrap();
    assert_eq!(block.next_free(), 2);
    assert_eq!(block.block_end(), 11);
    assert_eq!(block.remaining(), 9);
    assert_eq!(generator.refill_count(), 1);
}

/// A block stops short of the next executed interval.
#[test]
fn test_block_clipped_by_next_interval() {
    let mut generator = GtidGenerator::initialize(1000).unwrap();
    let mut executed = GtidSet::new();
    executed.add_range(sidno(1), 5, 8).unwrap();
    generator.recompute(&executed);

    let gnos: Vec<i64> = (0..6)
        .map(|_| allocate(&mut generator, &mut executed, sidno(1)))
        .collect();

    assert_eq!(gnos, vec![1, 2, 3, 4, 8, 9]);
    assert_eq!(generator.refill_count(), 2);
}

/// Without a recompute, a sidno's first block starts above its largest gno.
#[test]
fn test_first_use_does_not_fill_gaps() {
    let mut generator = GtidGenerator::initialize(1000).unwrap();
    let mut executed = GtidSet::new();
    executed.add_range(sidno(1), 1, 101).unwrap();
    executed.add_range(sidno(1), 200, 251).unwrap();

    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 251);
    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 252);
    assert!(!executed.contains(sidno(1), 101));
}

/// Gnos executed behind the generator's back are skipped.
#[test]
fn test_externally_executed_gnos_skipped() {
    let mut generator = GtidGenerator::initialize(100).unwrap();
    let mut executed = GtidSet::new();

    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 1);
    executed.add_range(sidno(1), 2, 5).unwrap();
    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 5);
    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 6);
}

/// Sidnos keep independent blocks.
#[test]
fn test_sidnos_are_independent() {
    let mut generator = GtidGenerator::initialize(3).unwrap();
    let mut executed = GtidSet::new();

    for expected in 1..=7 {
        assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), expected);
    }
    assert_eq!(allocate(&mut generator, &mut executed, sidno(2)), 1);
    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), 8);
    assert!(generator.reserved_block(sidno(3)).is_none());
}

// =============================================================================
// Exhaustion Tests
// =============================================================================

/// The last legal gno is handed out, then allocation fails.
#[test]
fn test_exhaustion_after_last_gno() {
    let mut generator = GtidGenerator::initialize(1000).unwrap();
    let mut executed = GtidSet::new();
    executed.add_range(sidno(1), 1, GNO_MAX).unwrap();
    generator.recompute(&executed);

    assert_eq!(allocate(&mut generator, &mut executed, sidno(1)), GNO_MAX);
    let block = generator.reserved_block(sidno(1)).unwrap();
    assert_eq!(block.block_end(), GNO_END);

    let err = generator
        .next(&Uuid::nil(), sidno(1), &executed)
        .unwrap_err();
    assert_eq!(err, GeneratorError::Exhausted { sidno: sidno(1) });
    assert_eq!(generator.reserved_block(sidno(1)), Some(block));
}

// =============================================================================
// Recompute Tests
// =============================================================================

/// Recompute drops reservations and restarts at each sidno's first gap.
#[test]
fn test_recompute_restarts_at_first_gap() {
    let mut generator = GtidGenerator::initialize(50).unwrap();
    let mut executed = GtidSet::new();
    for _ in 0..10 {
        allocate(&mut generator, &mut executed, sidno(1));
    }

    let mut recovered = GtidSet::new();
    recovered.add_range(sidno(1), 1, 4).unwrap();
    recovered.add_range(sidno(1), 6, 9).unwrap();
    recovered.add_range(sidno(2), 1, 2).unwrap();
    generator.recompute(&recovered);

    assert_eq!(generator.reserved_block(sidno(1)).unwrap().next_free(), 4);
    assert_eq!(generator.reserved_block(sidno(2)).unwrap().next_free(), 2);

    assert_eq!(allocate(&mut generator, &mut recovered, sidno(1)), 4);
    assert_eq!(allocate(&mut generator, &mut recovered, sidno(1)), 5);
    assert_eq!(allocate(&mut generator, &mut recovered, sidno(1)), 9);
}
