//! Certifier
//!
//! Decides accept/reject for every totally-ordered transaction and owns the
//! state those decisions mutate:
//! - the `TsidMap` naming every sequence space seen so far
//! - the executed `GtidSet`
//! - the `GtidGenerator` minting gnos for automatic identities
//! - the fingerprint table used for write-set conflict detection
//!
//! # Guarantees
//!
//! - One mutex serialises the whole decision; accepts are observed in order
//! - The version counter advances by exactly one per accept
//! - A minted gno is never already executed and is published before the
//!   mutex is released
//! - Conflict, duplicate, exhausted and invalid are ordinary `Decision`s
//! - An executed-set inconsistency aborts the process

mod certifier;
mod config;
mod decision;
mod errors;
mod fingerprints;
mod horizon;
mod transaction;

pub use certifier::Certifier;
pub use config::{CertifierConfig, DEFAULT_GC_INTERVAL};
pub use decision::{Decision, RejectKind};
pub use errors::{CertifierError, CertifierResult};
pub use horizon::{MonotonicClock, NeverPrune, SnapshotHorizon, SystemClock};
pub use transaction::{Fingerprint, RequestedIdentity, Transaction};
