//! GTID Generator
//!
//! Block-based allocator of gap-free sequence numbers per sidno.
//!
//! - Each sidno owns one reserved block `[next_free, block_end)`
//! - A block never overlaps the executed set at the moment it is reserved
//! - Gnos handed out for a sidno are strictly increasing and skip nothing
//!   that is free
//! - The originating member does not partition the gno space
//!
//! The generator holds no lock. The certifier calls it only from inside its
//! critical section and lends it the executed set for the duration of a call.

mod errors;
mod generator;

pub use errors::{GeneratorError, GeneratorResult};
pub use generator::{GtidGenerator, ReservedBlock, DEFAULT_BLOCK_SIZE};
