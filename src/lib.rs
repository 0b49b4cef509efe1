//! gtidcert - GTID generation and write-set certification
//!
//! - `identifier`: UUIDs, tags, TSIDs, sidno mapping and GTID sets
//! - `generator`: block-based gno allocation
//! - `certifier`: conflict detection, identity assignment, publication
//! - `observability`: structured logging and metrics
//! - `cli`: JSON-lines front end

pub mod certifier;
pub mod cli;
pub mod generator;
pub mod identifier;
pub mod observability;
