//! Generator Error Types
//!
//! Neither error is fatal: a zero block size is a configuration mistake and
//! exhaustion leaves the generator untouched so a retry can succeed once the
//! executed set changes.

use thiserror::Error;

use crate::identifier::Sidno;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// Block size must be positive
    #[error("Block size must be greater than zero")]
    ZeroBlockSize,

    /// No legal gno is left for the sidno
    #[error("No gno available for sidno {sidno}")]
    Exhausted { sidno: Sidno },
}

impl GeneratorError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GeneratorError::Exhausted { .. })
    }
}
