//! Certifier - total-order accept/reject for incoming transactions
//!
//! For each transaction, in delivery order:
//! 1. Validate: explicit gno in range, snapshot version not from the future
//! 2. Conflict check against the fingerprint table
//! 3. Resolve identity: explicit gno must be absent from the executed set,
//!    automatic identity asks the generator for the next gno
//! 4. Publish: add the gno to the executed set, bump the version counter,
//!    stamp every fingerprint of the write-set with the new version
//!
//! Steps 1-4 run under one mutex. Two accepts never interleave their effects
//! and rejects leave every piece of state untouched.
//!
//! # Locking
//!
//! `state` is the certifier mutex. The TSID map has its own reader-writer
//! lock which is only ever taken while `state` is held or on its own, never
//! the other way around.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::config::CertifierConfig;
use super::decision::{Decision, RejectKind};
use super::errors::{CertifierError, CertifierResult};
use super::fingerprints::FingerprintTable;
use super::horizon::{MonotonicClock, SnapshotHorizon, SystemClock};
use super::transaction::{Fingerprint, RequestedIdentity, Transaction};
use crate::generator::GtidGenerator;
use crate::identifier::{is_valid_gno, Gno, Gtid, GtidSet, Sidno, TsidMap};
use crate::observability::{
    log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot, ObservationScope,
};

/// Everything mutated by a decision. Guarded by the certifier mutex.
#[derive(Debug)]
struct CertifierState {
    executed: GtidSet,
    generator: GtidGenerator,
    fingerprints: FingerprintTable,
    /// Incremented by exactly one per accept.
    version: u64,
    /// Set by the first `certify`; seeding is refused afterwards.
    started: bool,
    accepts_since_prune: u64,
}

pub struct Certifier {
    config: CertifierConfig,
    tsid_map: TsidMap,
    state: Mutex<CertifierState>,
    horizon: Arc<dyn SnapshotHorizon>,
    clock: Arc<dyn MonotonicClock>,
    metrics: MetricsRegistry,
}

impl Certifier {
    /// Create a certifier with an empty executed set.
    pub fn new(config: CertifierConfig, horizon: Arc<dyn SnapshotHorizon>) -> CertifierResult<Self> {
        Self::with_clock(config, horizon, Arc::new(SystemClock))
    }

    /// Create a certifier timing itself with `clock`.
    pub fn with_clock(
        config: CertifierConfig,
        horizon: Arc<dyn SnapshotHorizon>,
        clock: Arc<dyn MonotonicClock>,
    ) -> CertifierResult<Self> {
        config.validate()?;
        let generator = GtidGenerator::initialize(config.block_size)?;

        log_event_with_fields(
            Event::CertifierStart,
            &[
                ("block_size", config.block_size.to_string().as_str()),
                ("gc_interval", config.gc_interval.to_string().as_str()),
            ],
        );

        Ok(Self {
            config,
            tsid_map: TsidMap::new(),
            state: Mutex::new(CertifierState {
                executed: GtidSet::new(),
                generator,
                fingerprints: FingerprintTable::new(),
                version: 0,
                started: false,
                accepts_since_prune: 0,
            }),
            horizon,
            clock,
            metrics: MetricsRegistry::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CertifierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide one transaction. Callers deliver transactions in total order.
    pub fn certify(&self, transaction: &Transaction) -> Decision {
        let started_at = self.clock.now();
        self.metrics.increment_checked();

        let (decision, version) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            state.started = true;
            let decision = self.decide(state, transaction);
            self.metrics.set_block_refills(state.generator.refill_count());
            (decision, state.version)
        };

        match &decision {
            Decision::Accept(gtid) => {
                self.metrics.increment_accepted();
                log_event_with_fields(
                    Event::TransactionAccepted,
                    &[
                        ("gtid", gtid.to_string().as_str()),
                        ("version", version.to_string().as_str()),
                    ],
                );
            }
            Decision::Reject(kind) => {
                match kind {
                    RejectKind::Conflict => self.metrics.increment_conflicts(),
                    RejectKind::Duplicate => self.metrics.increment_duplicates(),
                    RejectKind::Exhausted => self.metrics.increment_exhausted(),
                    RejectKind::Invalid => self.metrics.increment_invalid(),
                }
                log_event_with_fields(
                    Event::TransactionRejected,
                    &[
                        ("originator", transaction.originator.to_string().as_str()),
                        ("reason", kind.as_str()),
                        ("tsid", transaction.identity.tsid().to_string().as_str()),
                    ],
                );
            }
        }

        let elapsed = self.clock.now().saturating_duration_since(started_at);
        self.metrics
            .add_certify_nanos(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
        decision
    }

    /// The decision algorithm. Runs entirely under the certifier mutex.
    fn decide(&self, state: &mut CertifierState, transaction: &Transaction) -> Decision {
        if transaction.snapshot_version > state.version {
            return Decision::Reject(RejectKind::Invalid);
        }
        if let RequestedIdentity::Explicit { gno, .. } = &transaction.identity {
            if !is_valid_gno(*gno) {
                return Decision::Reject(RejectKind::Invalid);
            }
        }

        if state
            .fingerprints
            .conflicts(&transaction.write_set, transaction.snapshot_version)
        {
            return Decision::Reject(RejectKind::Conflict);
        }

        let tsid = transaction.identity.tsid();
        let sidno = match self.tsid_map.add(tsid) {
            Ok(sidno) => sidno,
            Err(_) => return Decision::Reject(RejectKind::Exhausted),
        };
        state.executed.ensure_sidno(sidno);

        let gno = match &transaction.identity {
            RequestedIdentity::Explicit { gno, .. } => {
                if state.executed.contains(sidno, *gno) {
                    return Decision::Reject(RejectKind::Duplicate);
                }
                *gno
            }
            RequestedIdentity::Automatic { .. } => {
                match state
                    .generator
                    .next(&transaction.originator, sidno, &state.executed)
                {
                    Ok(gno) => {
                        self.metrics.increment_gnos_allocated();
                        gno
                    }
                    Err(_) => return Decision::Reject(RejectKind::Exhausted),
                }
            }
        };

        self.publish(state, sidno, gno, &transaction.write_set);

        match Gtid::new(tsid.clone(), gno) {
            Ok(gtid) => Decision::Accept(gtid),
            Err(e) => fatal_invariant(&format!("published gno {} is not a GTID: {}", gno, e)),
        }
    }

    /// Executed-set insert, version bump and fingerprint stamping as one step.
    fn publish(&self, state: &mut CertifierState, sidno: Sidno, gno: Gno, write_set: &[Fingerprint]) {
        match state.executed.add(sidno, gno) {
            Ok(true) => {}
            Ok(false) => fatal_invariant(&format!(
                "gno {} for sidno {} was already executed at publish",
                gno, sidno
            )),
            Err(e) => fatal_invariant(&format!(
                "executed set refused gno {} for sidno {}: {}",
                gno, sidno, e
            )),
        }
        state.version += 1;
        state.fingerprints.record(write_set, state.version);

        state.accepts_since_prune += 1;
        if state.accepts_since_prune >= self.config.gc_interval {
            self.prune_locked(state);
        }
    }

    fn prune_locked(&self, state: &mut CertifierState) -> usize {
        state.accepts_since_prune = 0;
        let Some(oldest_live) = self.horizon.oldest_live_snapshot_version() else {
            return 0;
        };

        let removed = state.fingerprints.prune_older_than(oldest_live);
        self.metrics.record_prune(removed as u64);
        log_event_with_fields(
            Event::FingerprintsPruned,
            &[
                ("oldest_live", oldest_live.to_string().as_str()),
                ("removed", removed.to_string().as_str()),
                ("remaining", state.fingerprints.len().to_string().as_str()),
            ],
        );
        removed
    }

    /// Prune the fingerprint table now. Returns the number of entries removed.
    pub fn prune(&self) -> usize {
        let mut guard = self.lock();
        self.prune_locked(&mut guard)
    }

    /// Replace the executed set from its text form.
    ///
    /// Only allowed before the first `certify`. Does not touch the generator;
    /// call `recompute` afterwards.
    pub fn seed_executed_set(&self, text: &str) -> CertifierResult<()> {
        let scope = ObservationScope::new("SEED_EXECUTED_SET");
        let mut state = self.lock();

        if state.started {
            scope.fail("certification already started");
            return Err(CertifierError::AlreadyStarted);
        }

        // Validate against a scratch map so a malformed seed registers no TSIDs.
        let parsed = GtidSet::from_text(text, &TsidMap::new())
            .and_then(|_| GtidSet::from_text(text, &self.tsid_map));
        let executed = match parsed {
            Ok(executed) => executed,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        let gnos = executed.len().to_string();
        state.executed = executed;
        drop(state);

        log_event_with_fields(Event::ExecutedSetSeeded, &[("gnos", gnos.as_str())]);
        scope.complete(&[("gnos", gnos.as_str())]);
        Ok(())
    }

    /// Reset the generator against the current executed set.
    ///
    /// The caller must ensure no `certify` is in flight.
    pub fn recompute(&self) {
        let scope = ObservationScope::new("RECOMPUTE");
        let mut guard = self.lock();
        let state = &mut *guard;
        state.generator.recompute(&state.executed);
        let sidnos = state.executed.sidnos().count().to_string();
        drop(guard);

        log_event_with_fields(Event::GeneratorRecomputed, &[("sidnos", sidnos.as_str())]);
        scope.complete(&[]);
    }

    /// Version counter: number of accepts so far.
    pub fn current_version(&self) -> u64 {
        self.lock().version
    }

    /// Canonical text of the executed set.
    pub fn executed_set_text(&self) -> String {
        let state = self.lock();
        state.executed.to_text(&self.tsid_map)
    }

    /// Copy of the executed set. Sidnos resolve through `tsid_map()`.
    pub fn executed_set(&self) -> GtidSet {
        self.lock().executed.clone()
    }

    /// True if `gtid` is in the executed set.
    pub fn contains(&self, gtid: &Gtid) -> bool {
        let state = self.lock();
        match self.tsid_map.lookup(gtid.tsid()) {
            Some(sidno) => state.executed.contains(sidno, gtid.gno()),
            None => false,
        }
    }

    /// Version at which `fingerprint` was last committed, if still tracked.
    pub fn last_committed_version(&self, fingerprint: &Fingerprint) -> Option<u64> {
        self.lock().fingerprints.last_committed(fingerprint)
    }

    /// Number of fingerprints currently tracked.
    pub fn fingerprint_count(&self) -> usize {
        self.lock().fingerprints.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn tsid_map(&self) -> &TsidMap {
        &self.tsid_map
    }

    pub fn config(&self) -> &CertifierConfig {
        &self.config
    }
}

/// Log and abort. The executed set is authoritative replicated state; a
/// corrupted one must not keep serving.
fn fatal_invariant(reason: &str) -> ! {
    log_event_with_fields(Event::InvariantViolation, &[("reason", reason)]);
    std::process::abort()
}
