//! CLI command implementations
//!
//! `certify` boots a certifier from a config file and streams decisions:
//! 1. Load and validate configuration
//! 2. Construct the certifier
//! 3. Seed the executed set and recompute the generator, if configured
//! 4. Certify each stdin line in order
//! 5. Emit a summary line
//!
//! `normalize` prints the canonical text of a GTID set.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{decision_json, malformed_json, summary_json, write_line, TransactionRequest};
use crate::certifier::{Certifier, CertifierConfig, Decision, NeverPrune};
use crate::identifier::{GtidSet, TsidMap};
use crate::observability::{log_event_with_fields, Event, Logger};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    Logger::set_min_severity(cli.log_level);
    match cli.command {
        Command::Certify { config } => certify(&config),
        Command::Normalize { text } => {
            let canonical = normalize(&text)?;
            println!("{}", canonical);
            Ok(())
        }
    }
}

/// Boot a certifier from `config_path` and certify stdin into stdout.
pub fn certify(config_path: &Path) -> CliResult<()> {
    let config = CertifierConfig::load(config_path)?;
    let block_size = config.block_size.to_string();
    let path = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", path.as_str()), ("block_size", block_size.as_str())],
    );

    let certifier = boot(config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    certify_stream(&certifier, stdin.lock(), &mut stdout.lock())
}

/// Build a certifier and apply the configured seed.
///
/// The CLI has no readers of its own, so nothing ever holds a snapshot
/// open and the fingerprint table is never pruned.
pub fn boot(config: CertifierConfig) -> CliResult<Certifier> {
    let seed = config.seed.clone();
    let certifier = Certifier::new(config, Arc::new(NeverPrune))?;
    if let Some(seed) = seed {
        certifier.seed_executed_set(&seed)?;
        certifier.recompute();
    }
    Ok(certifier)
}

/// Certify every request read from `input`, writing one decision per line.
///
/// Lines that do not parse, including lines that are not UTF-8, are answered
/// with `reject(invalid)` and do not reach the certifier. Returns after writing the summary line.
pub fn certify_stream<R: BufRead, W: Write>(
    certifier: &Certifier,
    mut input: R,
    output: &mut W,
) -> CliResult<()> {
    let mut seq: u64 = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                seq += 1;
                write_line(output, &malformed_json(seq, &format!("invalid UTF-8: {}", e)))?;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        seq += 1;

        let request = match TransactionRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                write_line(output, &malformed_json(seq, &e.to_string()))?;
                continue;
            }
        };
        let transaction = match request.into_transaction() {
            Ok(transaction) => transaction,
            Err(e) => {
                write_line(output, &malformed_json(seq, &e.to_string()))?;
                continue;
            }
        };

        let decision: Decision = certifier.certify(&transaction);
        write_line(output, &decision_json(seq, &decision))?;
    }

    let summary = summary_json(
        &certifier.executed_set_text(),
        certifier.current_version(),
        &certifier.metrics(),
    );
    write_line(output, &summary)
}

/// Canonical form of a GTID-set text.
pub fn normalize(text: &str) -> CliResult<String> {
    let map = TsidMap::new();
    let set = GtidSet::from_text(text, &map)?;
    Ok(set.to_text(&map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    const A: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

    fn run_stream(certifier: &Certifier, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        certify_stream(certifier, Cursor::new(input.to_string()), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn request(tsid: &str, gno: Option<i64>, keys: &[&str], snapshot: u64) -> String {
        let mut value = serde_json::json!({
            "originator": A,
            "tsid": tsid,
            "write_set": keys,
            "snapshot_version": snapshot,
        });
        if let Some(gno) = gno {
            value["gno"] = gno.into();
        }
        value.to_string()
    }

    #[test]
    fn test_normalize_canonicalizes() {
        let text = format!("{}:5-7:1-3:4", A);
        assert_eq!(normalize(&text).unwrap(), format!("{}:1-7", A));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize("not-a-set").is_err());
    }

    #[test]
    fn test_stream_accepts_and_summarizes() {
        let certifier = boot(CertifierConfig::default()).unwrap();
        let input = format!(
            "{}\n\n{}\n",
            request(A, None, &["k1"], 0),
            request(A, None, &["k2"], 1)
        );
        let lines = run_stream(&certifier, &input);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["decision"], "accept");
        assert_eq!(lines[0]["gtid"], format!("{}:1", A));
        assert_eq!(lines[1]["gtid"], format!("{}:2", A));
        assert_eq!(lines[1]["seq"], 2);
        assert_eq!(lines[2]["summary"]["executed"], format!("{}:1-2", A));
        assert_eq!(lines[2]["summary"]["version"], 2);
    }

    #[test]
    fn test_stream_reports_conflict_and_duplicate() {
        let certifier = boot(CertifierConfig::default()).unwrap();
        let input = [
            request(A, Some(1), &["k"], 0),
            request(A, None, &["k"], 0),
            request(A, Some(1), &[], 1),
        ]
        .join("\n");
        let lines = run_stream(&certifier, &input);

        assert_eq!(lines[0]["decision"], "accept");
        assert_eq!(lines[1]["reason"], "conflict");
        assert_eq!(lines[2]["reason"], "duplicate");
    }

    #[test]
    fn test_stream_survives_malformed_lines() {
        let certifier = boot(CertifierConfig::default()).unwrap();
        let input = format!("{{not json\n{}\n", request(A, None, &[], 0));
        let lines = run_stream(&certifier, &input);

        assert_eq!(lines[0]["decision"], "reject");
        assert_eq!(lines[0]["reason"], "invalid");
        assert!(lines[0]["message"].is_string());
        assert_eq!(lines[1]["decision"], "accept");
    }

    #[test]
    fn test_stream_survives_invalid_utf8() {
        let certifier = boot(CertifierConfig::default()).unwrap();
        let mut input = vec![0xff, 0xfe, b'{', b'\n'];
        input.extend_from_slice(request(A, None, &[], 0).as_bytes());
        input.push(b'\n');

        let mut out = Vec::new();
        certify_stream(&certifier, Cursor::new(input), &mut out).unwrap();
        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["reason"], "invalid");
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[1]["decision"], "accept");
        assert_eq!(lines[1]["seq"], 2);
    }

    #[test]
    fn test_boot_applies_seed() {
        let config = CertifierConfig {
            seed: Some(format!("{}:1-100:200-250", A)),
            ..CertifierConfig::default()
        };
        let certifier = boot(config).unwrap();
        let lines = run_stream(&certifier, &request(A, None, &[], 0));
        assert_eq!(lines[0]["gtid"], format!("{}:101", A));
    }

    #[test]
    fn test_boot_rejects_bad_seed() {
        let config = CertifierConfig {
            seed: Some("garbage".to_string()),
            ..CertifierConfig::default()
        };
        assert!(boot(config).is_err());
    }
}
