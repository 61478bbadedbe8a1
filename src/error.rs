use alloc::string::String;
use enough::StopReason;

/// Errors from `.npy` probing, decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NpyError {
    #[error("missing \\x93NUMPY magic prefix")]
    BadMagic,

    #[error("header dictionary has no usable `{0}` entry")]
    MissingField(&'static str),

    #[error("unsupported byte order (only little-endian arrays are supported)")]
    UnsupportedByteOrder,

    #[error("unsupported memory order (only C-order arrays are supported)")]
    UnsupportedMemoryOrder,

    #[error("unsupported array rank {0} (expected 2, 3 or 4 dimensions)")]
    UnsupportedRank(usize),

    #[error("too many channels: {0} (at most 4 are supported)")]
    TooManyChannels(u64),

    #[error("unsupported element type: {0}")]
    UnsupportedElementType(String),

    #[error("truncated pixel data: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },

    #[error("buffer size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("array shape has a zero-sized dimension")]
    ZeroDimension,

    #[error("dimensions too large: {width}x{height}x{channels}")]
    DimensionsTooLarge {
        width: u64,
        height: u64,
        channels: u64,
    },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StopReason> for NpyError {
    fn from(r: StopReason) -> Self {
        NpyError::Cancelled(r)
    }
}
