//! Read-response envelope (C6): a tagged variant carrying either a
//! content digest or a full row, with a fixed framed wire form.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ ReadResponse                                           │
//! │┌ ─ ─ ─ ─ ─ ─┌ ─ ─ ─ ─ ─ ┬ ─ ─ ─┌ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ │
//! │  digestSize │ digest     isDigest │ row (if !isDigest) │
//! ││    i32     │  bytes    │   u8    │      bytes          │
//! │ ─ ─ ─ ─ ─ ─ ┘─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┘─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┘│
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! `digestSize` is `len(digest)` for a digest response, `0` for a data
//! response. The row's own serializer is supplied by the caller (the
//! storage layer owns that format); this module only frames around it.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use counter_common::{CounterError, CounterResult};

/// A row payload whose wire form is owned by the storage layer. Capturing
/// the capability as a trait object here plays the role the source fills
/// with reflection: the envelope holds a reference to "whatever knows how
/// to serialize itself," resolved at construction instead of at decode
/// time.
pub trait RowPayload: std::fmt::Debug {
    fn encode_row(&self, out: &mut BytesMut);
}

#[derive(Debug)]
pub enum ReadResponse {
    Digest(Bytes),
    Data(Box<dyn RowPayload>),
}

impl ReadResponse {
    pub fn is_digest(&self) -> bool {
        matches!(self, ReadResponse::Digest(_))
    }

    pub fn digest(&self) -> Option<&Bytes> {
        match self {
            ReadResponse::Digest(d) => Some(d),
            ReadResponse::Data(_) => None,
        }
    }

    pub fn row(&self) -> Option<&dyn RowPayload> {
        match self {
            ReadResponse::Digest(_) => None,
            ReadResponse::Data(row) => Some(row.as_ref()),
        }
    }

    /// Encodes the fixed frame. For a `Data` response, the row's own
    /// serializer is invoked and appended after the one-byte tag.
    pub fn encode(&self, out: &mut BytesMut) {
        match self {
            ReadResponse::Digest(d) => {
                out.put_i32(d.len() as i32);
                out.put_slice(d);
                out.put_u8(1);
            }
            ReadResponse::Data(row) => {
                out.put_i32(0);
                out.put_u8(0);
                row.encode_row(out);
            }
        }
    }
}

/// Decodes the digest/data tag and, for a digest response, the digest
/// bytes. The row branch is left to the caller: decoding a `Data` row
/// needs the storage layer's deserializer, which this crate does not
/// have, so this returns the *remaining* bytes alongside `None` for the
/// caller to hand to that deserializer.
pub struct DecodedFrame {
    pub digest: Option<Bytes>,
}

pub fn decode_frame(buf: &mut impl Buf) -> CounterResult<DecodedFrame> {
    if buf.remaining() < 4 {
        return Err(CounterError::decode("truncated digestSize"));
    }
    let digest_size = buf.get_i32();
    if digest_size < 0 {
        return Err(CounterError::decode("negative digestSize"));
    }
    if (buf.remaining() as i64) < digest_size as i64 {
        return Err(CounterError::decode("truncated digest"));
    }
    let digest_bytes = buf.copy_to_bytes(digest_size as usize);

    if buf.remaining() < 1 {
        return Err(CounterError::decode("truncated isDigest tag"));
    }
    let is_digest = buf.get_u8() != 0;

    if is_digest != (digest_size > 0) {
        return Err(CounterError::BadResponseFrame {
            digest_size,
            is_digest,
        });
    }

    Ok(DecodedFrame {
        digest: if is_digest { Some(digest_bytes) } else { None },
    })
}
