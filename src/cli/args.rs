//! CLI argument definitions using clap
//!
//! Commands:
//! - gtidcert certify --config <path>
//! - gtidcert normalize <gtid-set>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// gtidcert - GTID generator and write-set certifier
#[derive(Parser, Debug)]
#[command(name = "gtidcert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity (trace, info, warn, error, fatal)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Severity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Certify JSON-lines transactions read from stdin
    Certify {
        /// Path to configuration file
        #[arg(long, default_value = "./gtidcert.json")]
        config: PathBuf,
    },

    /// Print the canonical form of a GTID set
    Normalize {
        /// GTID-set text, e.g. "uuid:1-5:7,uuid:tag:1"
        text: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
