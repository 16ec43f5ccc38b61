//! DCX error types

use crate::error::ErrorKind;
use crate::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// DCX-specific error type
#[derive(Debug, Error)]
pub enum DcxError {
    /// Could not open the container file
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input ended before the 64-byte header
    #[error("truncated DCX header: got {available} of 64 bytes")]
    TruncatedHeader {
        /// Bytes actually available
        available: usize,
    },

    /// Invalid DCX magic bytes
    #[error("invalid DCX magic: expected [44 43 58], got {0:02X?}")]
    InvalidMagic([u8; 3]),

    /// Method tag that is not a known compression method
    #[error("unknown DCX compression method: {0:02X?}")]
    UnknownMethod([u8; 4]),

    /// Known compression method that this decoder does not implement
    #[error("unsupported DCX compression method '{}'", String::from_utf8_lossy(.0))]
    UnsupportedMethod([u8; 4]),

    /// Compressed stream ended before the decoder reported completion
    #[error("compressed stream truncated after {produced} of {expected} bytes")]
    TruncatedStream {
        /// Bytes produced before the input ran out
        produced: usize,
        /// Declared decompressed size
        expected: usize,
    },

    /// Stream holds more data than the declared decompressed size
    #[error("decompressed size exceeds declared {expected} bytes")]
    SizeOverflow {
        /// Declared decompressed size
        expected: usize,
    },

    /// Stream completed short of the declared decompressed size
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Declared decompressed size
        expected: usize,
        /// Bytes actually produced
        actual: usize,
    },

    /// Decoder made no progress on the available input
    #[error("inflate stalled after {produced} bytes")]
    Stalled {
        /// Bytes produced before stalling
        produced: usize,
    },

    /// Could not allocate the output buffer
    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory {
        /// Requested allocation size
        requested: usize,
    },

    /// Corrupt deflate data or missing dictionary
    #[error("inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    /// Seek to the stream start failed
    #[error("cannot seek to compressed stream: {0}")]
    Seek(#[from] SourceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl DcxError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } | Self::Seek(_) | Self::Io(_) => ErrorKind::Io,
            Self::TruncatedHeader { .. } => ErrorKind::OutOfBounds,
            Self::UnsupportedMethod(_) => ErrorKind::UnsupportedVariant,
            Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Self::InvalidMagic(_)
            | Self::UnknownMethod(_)
            | Self::TruncatedStream { .. }
            | Self::SizeOverflow { .. }
            | Self::SizeMismatch { .. }
            | Self::Stalled { .. }
            | Self::Inflate(_)
            | Self::BinRw(_) => ErrorKind::Format,
        }
    }
}

/// Result type for DCX operations
pub type DcxResult<T> = Result<T, DcxError>;
