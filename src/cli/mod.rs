//! CLI module for gtidcert
//!
//! Provides command-line interface for:
//! - certify: Stream JSON-lines transactions through a certifier
//! - normalize: Print the canonical form of a GTID set

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, certify, certify_stream, normalize, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{decision_json, malformed_json, summary_json, write_line, TransactionRequest};
