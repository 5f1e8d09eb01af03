use thiserror::Error;

pub type CounterResult<T> = Result<T, CounterError>;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Malformed counter context: length ({len}) is not a multiple of the step length ({step_length})")]
    MalformedContext { len: usize, step_length: usize },

    #[error("Bad read-response frame: digestSize ({digest_size}) and isDigest ({is_digest}) disagree")]
    BadResponseFrame { digest_size: i32, is_digest: bool },

    #[error("Bloom filter parameters cannot be satisfied: requested {requested} buckets, cap is {cap}")]
    UnsupportedBloomSize { requested: u64, cap: u64 },

    /// Raised only by deserializers. `source` carries the underlying
    /// upstream failure (an I/O error, a malformed sub-frame, ...) when
    /// one is available; call sites that fail a bounds check with no
    /// deeper cause to report leave it `None`.
    #[error("Failed to decode: {message}")]
    DecodeError {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    #[error("Local node id already initialized with a different address")]
    AlreadyInitialized,
}

impl CounterError {
    /// Constructs a [`CounterError::DecodeError`] with no underlying
    /// cause — the common case today, where the failure is a bounds
    /// check rather than a wrapped upstream error.
    pub fn decode(message: impl Into<Box<str>>) -> Self {
        CounterError::DecodeError {
            message: message.into(),
            source: None,
        }
    }

    /// Constructs a [`CounterError::DecodeError`] wrapping an upstream
    /// failure for `#[source]`/`Error::source()` to expose.
    pub fn decode_with_source(
        message: impl Into<Box<str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CounterError::DecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
