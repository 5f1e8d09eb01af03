//! Byte-packing primitives shared by the codec and engine: big-endian
//! 64-bit encode/decode, lexicographic sub-array compare, and the
//! process-wide local-node id cache.

use std::cmp::Ordering;

use counter_common::CounterError;
use once_cell::sync::OnceCell;

/// Stores an 8-byte big-endian encoding of `v` at `dst[off..off + 8]`.
///
/// # Panics
/// Panics if `dst` is not at least `off + 8` bytes long — callers own the
/// buffer and are expected to have sized it correctly.
pub fn encode_u64_be(dst: &mut [u8], off: usize, v: u64) {
    dst[off..off + 8].copy_from_slice(&v.to_be_bytes());
}

/// Loads an 8-byte big-endian integer from `src[off..off + 8]`.
pub fn decode_u64_be(src: &[u8], off: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&src[off..off + 8]);
    u64::from_be_bytes(buf)
}

/// Unsigned lexicographic comparison of `len` bytes starting at `a_off` in
/// `a` and `b_off` in `b`.
pub fn compare_subrange(a: &[u8], a_off: usize, b: &[u8], b_off: usize, len: usize) -> Ordering {
    a[a_off..a_off + len].cmp(&b[b_off..b_off + len])
}

/// The process-wide local-node identifier, resolved once at startup.
///
/// Callers that need to know "who am I" (coordinators merging a local
/// context into a replicated one) read this cache; the engine itself
/// never consults it — every `counter-core` operation takes the local id
/// as an explicit parameter, keeping the engine pure and reentrant.
static LOCAL_ID: OnceCell<Vec<u8>> = OnceCell::new();

pub struct LocalId;

impl LocalId {
    /// Initializes the process-wide local id cache with `addr`'s bytes.
    ///
    /// Idempotent: calling this again with the same bytes is a no-op
    /// success. Calling it with different bytes returns
    /// [`CounterError::AlreadyInitialized`].
    pub fn init(addr: &[u8]) -> Result<(), CounterError> {
        match LOCAL_ID.get() {
            None => {
                // set() may race with another thread's init; OnceCell
                // guarantees only one writer wins, so re-check afterwards.
                let _ = LOCAL_ID.set(addr.to_vec());
                if LOCAL_ID.get().map(|v| v.as_slice()) == Some(addr) {
                    Ok(())
                } else {
                    Err(CounterError::AlreadyInitialized)
                }
            }
            Some(existing) if existing.as_slice() == addr => Ok(()),
            Some(_) => Err(CounterError::AlreadyInitialized),
        }
    }

    /// Returns the cached local id, or `None` if [`LocalId::init`] has not
    /// yet been called in this process.
    pub fn get() -> Option<Vec<u8>> {
        LOCAL_ID.get().cloned()
    }
}
