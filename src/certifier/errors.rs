//! Certifier Error Types
//!
//! These are errors of the certifier's control surface (construction,
//! configuration, seeding). Per-transaction outcomes are never errors: they
//! are `Decision` values.

use thiserror::Error;

use crate::generator::GeneratorError;
use crate::identifier::IdentifierError;

/// Result type for certifier operations
pub type CertifierResult<T> = Result<T, CertifierError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertifierError {
    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(String),

    /// Seeding attempted after the first certify call
    #[error("Executed set can only be seeded before the first certification")]
    AlreadyStarted,

    /// Identifier or GTID-set text rejected
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Generator rejected its parameters
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl CertifierError {
    /// Stable error code for boundary reporting.
    pub fn code(&self) -> &'static str {
        match self {
            CertifierError::InvalidConfig(_) => "CERTIFIER_INVALID_CONFIG",
            CertifierError::ConfigIo(_) => "CERTIFIER_CONFIG_IO",
            CertifierError::AlreadyStarted => "CERTIFIER_ALREADY_STARTED",
            CertifierError::Identifier(e) => e.code(),
            CertifierError::Generator(_) => "CERTIFIER_GENERATOR_ERROR",
        }
    }
}
