//! counter-core is the partitioned counter context engine: a compact,
//! byte-addressable per-node version vector carrying both a logical clock
//! and a running count, plus the Bloom bucket derivation and read-response
//! envelope that travel alongside it on the replica read path.
//!
//! Everything here is pure and synchronous — no component schedules work,
//! takes a lock, or blocks. Multiple threads may call any operation
//! concurrently as long as each call operates on its own buffers.

pub mod bloom;
pub mod bytes_codec;
pub mod context;
pub mod hash;
pub mod read_response;

pub use counter_common::{step_length, ContextRelationship, CounterError, CounterResult, Id, IdLen};
