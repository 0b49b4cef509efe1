//! Identifier Space
//!
//! The data model shared by the generator and the certifier:
//! - `Tag`, `Tsid`, `Gtid` - external names of sequence spaces and transactions
//! - `Sidno`, `Gno`, `Interval` - dense internal handles and sequence numbers
//! - `TsidMap` - TSID <-> sidno bijection with its own reader-writer lock
//! - `GtidSet` - the executed set, coalesced gno intervals per sidno
//!
//! Everything here is plain data and pure functions. Only `TsidMap` is
//! internally synchronised.

mod errors;
mod gno;
mod gtid_set;
mod tag;
mod text;
mod tsid;
mod tsid_map;

pub use errors::{IdentifierError, IdentifierResult};
pub use gno::{check_gno, is_valid_gno, Gno, Interval, Sidno, GNO_END, GNO_FIRST, GNO_MAX};
pub use gtid_set::GtidSet;
pub use tag::{Tag, TAG_MAX_LENGTH};
pub use tsid::{parse_uuid, Gtid, Tsid};
pub use tsid_map::{TsidMap, SIDNO_MAX};
