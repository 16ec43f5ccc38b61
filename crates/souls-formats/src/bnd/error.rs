//! Combined archive error types

use crate::dcx::DcxError;
use crate::error::{ErrorKind, OutOfBounds};
use std::path::PathBuf;
use thiserror::Error;

/// BND3 archive errors
#[derive(Debug, Error)]
pub enum BndError {
    /// Could not read the archive file
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Neither BND3 nor a DCX container
    #[error("invalid BND3 magic: got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Flags value outside the known layout table
    #[error("unsupported BND3 flags 0x{0:08X}")]
    UnsupportedFlags(u32),

    /// The wrapping DCX container could not be inflated
    #[error("cannot inflate archive: {0}")]
    Dcx(#[from] DcxError),

    /// Entry index past the file count
    #[error("entry {index} out of range (archive has {count} entries)")]
    IndexOutOfRange {
        /// Requested index
        index: u32,
        /// Number of entries
        count: u32,
    },

    /// A header field, record, name or entry extends past the buffer
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl BndError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::Io,
            Self::InvalidMagic(_) | Self::BinRw(_) => ErrorKind::Format,
            Self::UnsupportedFlags(_) => ErrorKind::UnsupportedVariant,
            Self::Dcx(e) => e.kind(),
            Self::IndexOutOfRange { .. } | Self::OutOfBounds(_) => ErrorKind::OutOfBounds,
        }
    }
}

/// Result type for combined archive operations
pub type BndResult<T> = Result<T, BndError>;
