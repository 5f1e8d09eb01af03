//! counter-common holds the small vocabulary shared between the counter
//! context engine and its callers: the node id type, the relationship
//! enum produced by a diff, and the error taxonomy.
//!
//! Do not depend on this crate directly for the engine itself — see
//! `counter-core`.

mod error;
pub mod logging;
mod relationship;

pub use error::{CounterError, CounterResult};
pub use relationship::ContextRelationship;

/// Byte width of one node identifier. IPv4 addresses are 4 bytes, IPv6
/// addresses are 16 bytes; the actual length used by a running process is
/// established once by whichever address the process resolves at startup
/// (see `counter_core::bytes_codec::LocalId`).
pub type IdLen = usize;

/// An opaque, fixed-length node identifier: the bytes of the node's local
/// address. Two ids are equal iff their bytes are equal; there is no
/// notion of ordering beyond unsigned lexicographic byte comparison.
pub type Id = Vec<u8>;

/// Step length of one packed tuple in a counter context: `id_len + 8 + 8`
/// (clock and count are each a big-endian `u64`/`i64`).
pub const fn step_length(id_len: IdLen) -> usize {
    id_len + 8 + 8
}
