//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero status.

use std::fmt;
use std::io;

use crate::certifier::CertifierError;
use crate::identifier::IdentifierError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing or invalid
    ConfigError,
    /// stdin/stdout failure
    IoError,
    /// GTID text rejected
    InvalidInput,
    /// Certifier could not be brought up
    BootFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GTIDCERT_CLI_CONFIG_ERROR",
            Self::IoError => "GTIDCERT_CLI_IO_ERROR",
            Self::InvalidInput => "GTIDCERT_CLI_INVALID_INPUT",
            Self::BootFailed => "GTIDCERT_CLI_BOOT_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<IdentifierError> for CliError {
    fn from(e: IdentifierError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<CertifierError> for CliError {
    fn from(e: CertifierError) -> Self {
        match e {
            CertifierError::InvalidConfig(_) | CertifierError::ConfigIo(_) => {
                Self::config_error(e.to_string())
            }
            other => Self::boot_failed(other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
