//! JSON-lines I/O for the certify command
//!
//! - Input: one transaction request object per line
//! - Output: one decision object per line, then one summary object
//! - Blank input lines are skipped; non-UTF-8 lines are rejected as invalid

use std::io::Write;

use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::CliResult;
use crate::certifier::{Decision, Fingerprint, Transaction};
use crate::identifier::{parse_uuid, Gno, IdentifierResult, Tsid};
use crate::observability::MetricsSnapshot;

/// Wire form of a transaction. A missing `gno` requests automatic identity.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub originator: String,
    pub tsid: String,
    #[serde(default)]
    pub gno: Option<Gno>,
    /// Raw keys, fingerprinted on the way in
    #[serde(default)]
    pub write_set: Vec<String>,
    #[serde(default)]
    pub snapshot_version: u64,
}

impl TransactionRequest {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn into_transaction(self) -> IdentifierResult<Transaction> {
        let originator = parse_uuid(&self.originator)?;
        let tsid: Tsid = self.tsid.parse()?;
        let transaction = match self.gno {
            Some(gno) => Transaction::explicit(originator, tsid, gno, self.snapshot_version),
            None => Transaction::automatic(originator, tsid, self.snapshot_version),
        };
        Ok(transaction.with_write_set(
            self.write_set
                .iter()
                .map(|key| Fingerprint::from_key(key.as_bytes())),
        ))
    }
}

/// JSON form of a decision for request number `seq`.
pub fn decision_json(seq: u64, decision: &Decision) -> Value {
    match decision {
        Decision::Accept(gtid) => json!({
            "seq": seq,
            "decision": "accept",
            "gtid": gtid.to_string(),
        }),
        Decision::Reject(kind) => json!({
            "seq": seq,
            "decision": "reject",
            "reason": kind.as_str(),
        }),
    }
}

/// JSON form of a request that never reached the certifier.
pub fn malformed_json(seq: u64, message: &str) -> Value {
    json!({
        "seq": seq,
        "decision": "reject",
        "reason": "invalid",
        "message": message,
    })
}

/// Final line of a certify run.
pub fn summary_json(executed: &str, version: u64, metrics: &MetricsSnapshot) -> Value {
    json!({
        "summary": {
            "executed": executed,
            "version": version,
            "metrics": metrics,
        }
    })
}

/// Write one JSON value followed by a newline.
pub fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
