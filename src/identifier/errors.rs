//! Identifier Error Types
//!
//! All identifier errors are invalid-argument errors: the caller supplied a
//! value that cannot name a transaction. None of them are fatal.

use thiserror::Error;

use super::gno::Gno;

/// Result type for identifier operations
pub type IdentifierResult<T> = Result<T, IdentifierError>;

/// Identifier errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// UUID text could not be parsed
    #[error("Malformed UUID: '{0}'")]
    MalformedUuid(String),

    /// Tag is too long or contains illegal characters
    #[error("Malformed tag: '{0}'")]
    MalformedTag(String),

    /// Gno outside [1, 2^63 - 2]
    #[error("Gno out of range: {0}")]
    GnoOutOfRange(Gno),

    /// Interval bounds are inverted or out of range
    #[error("Invalid interval: [{lo}, {hi})")]
    InvalidInterval { lo: Gno, hi: Gno },

    /// GTID or GTID-set text could not be parsed
    #[error("Malformed GTID text at '{fragment}': {reason}")]
    MalformedText { fragment: String, reason: String },

    /// No more sidnos can be assigned in this process
    #[error("Sidno space exhausted after {0} entries")]
    SidnoExhausted(u32),
}

impl IdentifierError {
    /// Create a malformed text error.
    pub fn malformed_text(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedText {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for boundary reporting.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedUuid(_) => "GTID_MALFORMED_UUID",
            Self::MalformedTag(_) => "GTID_MALFORMED_TAG",
            Self::GnoOutOfRange(_) => "GTID_GNO_OUT_OF_RANGE",
            Self::InvalidInterval { .. } => "GTID_INVALID_INTERVAL",
            Self::MalformedText { .. } => "GTID_MALFORMED_TEXT",
            Self::SidnoExhausted(_) => "GTID_SIDNO_EXHAUSTED",
        }
    }
}
