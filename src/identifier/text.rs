//! Canonical GTID-set text form
//!
//! Emission:
//! - One entry per TSID: `uuid[:tag]:interval(:interval)*`
//! - `interval` is `gno` or `first-last`, inclusive on both ends
//! - Intervals ascending and coalesced, entries sorted by TSID, joined by `,`
//! - The empty set is the empty string
//!
//! Parsing accepts the canonical form plus the grouped form where one UUID
//! carries several tags (`uuid:1-3:tag:1-5`), surrounding whitespace, and
//! unordered or overlapping intervals (coalesced on insert).

use std::fmt::{self, Write};

use super::errors::{IdentifierError, IdentifierResult};
use super::gno::{check_gno, Gno, Interval, Sidno};
use super::gtid_set::GtidSet;
use super::tag::Tag;
use super::tsid::{parse_uuid, Tsid};
use super::tsid_map::TsidMap;

impl GtidSet {
    /// Write the canonical text form into `out`.
    ///
    /// Sidnos unknown to `map` are skipped.
    pub fn write_text<W: Write>(&self, map: &TsidMap, out: &mut W) -> fmt::Result {
        let mut entries: Vec<(Tsid, Sidno)> = self
            .sidnos()
            .filter_map(|sidno| map.tsid(sidno).map(|tsid| (tsid, sidno)))
            .collect();
        entries.sort();

        for (position, (tsid, sidno)) in entries.iter().enumerate() {
            if position > 0 {
                out.write_char(',')?;
            }
            write!(out, "{}", tsid)?;
            for interval in self.intervals(*sidno) {
                write!(out, ":{}", interval)?;
            }
        }
        Ok(())
    }

    /// Canonical text form.
    pub fn to_text(&self, map: &TsidMap) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(map, &mut out);
        out
    }

    /// Parse a GTID-set text, registering every TSID it names in `map`.
    pub fn from_text(text: &str, map: &TsidMap) -> IdentifierResult<GtidSet> {
        let mut set = GtidSet::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(set);
        }
        for entry in text.split(',') {
            parse_entry(entry, map, &mut set)?;
        }
        Ok(set)
    }
}

/// Parse one `uuid(:tag|:interval)*` entry into `set`.
fn parse_entry(entry: &str, map: &TsidMap, set: &mut GtidSet) -> IdentifierResult<()> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(IdentifierError::malformed_text(entry, "empty entry"));
    }

    let mut parts = entry.split(':').map(str::trim);
    let uuid = parse_uuid(parts.next().unwrap_or_default())?;

    let mut tsid = Tsid::untagged(uuid);
    let mut sidno: Option<Sidno> = None;
    let mut has_intervals = false;
    let mut tag_given = false;

    for part in parts {
        if part.is_empty() {
            return Err(IdentifierError::malformed_text(entry, "empty field"));
        }
        if part.starts_with(|c: char| c.is_ascii_digit()) {
            let interval = parse_interval(part)?;
            let target = match sidno {
                Some(sidno) => sidno,
                None => {
                    let added = map.add(&tsid)?;
                    sidno = Some(added);
                    added
                }
            };
            set.add_interval(target, interval);
            has_intervals = true;
        } else {
            if tag_given && !has_intervals {
                return Err(IdentifierError::malformed_text(
                    entry,
                    format!("tag '{}' has no intervals", tsid.tag()),
                ));
            }
            tsid = Tsid::new(uuid, Tag::new(part)?);
            sidno = None;
            has_intervals = false;
            tag_given = true;
        }
    }

    if !has_intervals {
        return Err(IdentifierError::malformed_text(
            entry,
            "expected at least one interval",
        ));
    }
    Ok(())
}

/// Parse `gno` or `first-last` (inclusive) into a half-open interval.
fn parse_interval(text: &str) -> IdentifierResult<Interval> {
    let parse_gno = |field: &str| -> IdentifierResult<Gno> {
        let gno: Gno = field
            .trim()
            .parse()
            .map_err(|_| IdentifierError::malformed_text(text, "expected interval"))?;
        check_gno(gno)
    };

    let (first, last) = match text.split_once('-') {
        Some((first, last)) => (parse_gno(first)?, parse_gno(last)?),
        None => {
            let gno = parse_gno(text)?;
            (gno, gno)
        }
    };
    if last < first {
        return Err(IdentifierError::malformed_text(text, "interval end before start"));
    }
    Interval::new(first, last + 1)
}
