//! Observable certifier events
//!
//! Events are explicit and typed. Each maps to a stable upper-snake name
//! and a default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Certifier constructed and ready
    CertifierStart,
    /// Configuration file loaded
    ConfigLoaded,

    // Recovery
    /// Executed set replaced from text
    ExecutedSetSeeded,
    /// Generator state reset against the executed set
    GeneratorRecomputed,

    // Generator
    /// New block of gnos reserved for a sidno
    BlockReserved,
    /// No gno left in the legal range
    GnoExhausted,

    // Certification
    /// Transaction accepted with its final GTID
    TransactionAccepted,
    /// Transaction rejected
    TransactionRejected,
    /// Fingerprint table pruned
    FingerprintsPruned,

    /// Executed set corrupted (FATAL)
    InvariantViolation,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CertifierStart => "CERTIFIER_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ExecutedSetSeeded => "EXECUTED_SET_SEEDED",
            Event::GeneratorRecomputed => "GENERATOR_RECOMPUTED",
            Event::BlockReserved => "GTID_BLOCK_RESERVED",
            Event::GnoExhausted => "GTID_GNO_EXHAUSTED",
            Event::TransactionAccepted => "TRANSACTION_ACCEPTED",
            Event::TransactionRejected => "TRANSACTION_REJECTED",
            Event::FingerprintsPruned => "FINGERPRINTS_PRUNED",
            Event::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }

    /// Severity the event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::BlockReserved
            | Event::TransactionAccepted
            | Event::TransactionRejected => Severity::Trace,
            Event::GnoExhausted => Severity::Warn,
            Event::InvariantViolation => Severity::Fatal,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
