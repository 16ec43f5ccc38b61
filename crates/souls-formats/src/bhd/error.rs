//! Split archive error types

use crate::error::{ErrorKind, OutOfBounds};
use std::path::PathBuf;
use thiserror::Error;

/// BHF3/BDF3 split archive errors
#[derive(Debug, Error)]
pub enum BhdError {
    /// Could not read the index or data file
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No data file name can be derived from the index file name
    #[error("cannot derive data file name from '{}'", .0.display())]
    BadPath(PathBuf),

    /// File shorter than its fixed header
    #[error("{part} file too short: {len} bytes, need at least {min}")]
    TooShort {
        /// "index" or "data"
        part: &'static str,
        /// Actual length
        len: usize,
        /// Minimum length
        min: usize,
    },

    /// Wrong magic bytes
    #[error("invalid {part} magic: expected {expected:?}, got {actual:02X?}")]
    InvalidMagic {
        /// "index" or "data"
        part: &'static str,
        /// Expected magic as text
        expected: &'static str,
        /// Bytes actually found
        actual: [u8; 4],
    },

    /// Entry index past the file count
    #[error("entry {index} out of range (archive has {count} entries)")]
    IndexOutOfRange {
        /// Requested index
        index: u32,
        /// Number of entries
        count: u32,
    },

    /// A record, name or entry extends past its buffer
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl BhdError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } | Self::BadPath(_) => ErrorKind::Io,
            Self::TooShort { .. } | Self::InvalidMagic { .. } | Self::BinRw(_) => ErrorKind::Format,
            Self::IndexOutOfRange { .. } | Self::OutOfBounds(_) => ErrorKind::OutOfBounds,
        }
    }
}

/// Result type for split archive operations
pub type BhdResult<T> = Result<T, BhdError>;
