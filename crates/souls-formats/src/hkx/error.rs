//! Tagfile error types

use crate::error::{ErrorKind, OutOfBounds};
use crate::mesh::MeshError;
use thiserror::Error;

/// HKX tagfile errors
#[derive(Debug, Error)]
pub enum TagfileError {
    /// Input shorter than the 8-byte root chunk header
    #[error("tagfile too short: {0} bytes")]
    TooShort(usize),

    /// No "TAG0" tag at offset 4
    #[error("invalid tagfile magic: expected \"TAG0\", got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Chunk length smaller than its own header
    #[error("malformed chunk at 0x{offset:X}: length {length} is smaller than the header")]
    MalformedChunk {
        /// Absolute offset of the chunk
        offset: usize,
        /// Declared length (flags masked off)
        length: usize,
    },

    /// Chunk extends past the end of its enclosing region
    #[error("truncated chunk at 0x{offset:X}: length {length}, only {available} bytes left")]
    Truncated {
        /// Absolute offset of the chunk
        offset: usize,
        /// Declared length (flags masked off)
        length: usize,
        /// Bytes remaining in the enclosing region
        available: usize,
    },

    /// Required top-level section absent
    #[error("missing {} section", String::from_utf8_lossy(.0))]
    MissingSection([u8; 4]),

    /// Packed integer with an unrecognized prefix byte
    #[error("unsupported packed integer prefix 0x{byte:02X} at offset 0x{offset:X}")]
    UnsupportedPackedInt {
        /// Offset of the prefix byte within its section
        offset: usize,
        /// Prefix byte
        byte: u8,
    },

    /// Item or field read past the end of its section
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// Geometry could not be accumulated
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),

    /// Writing a dump failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagfileError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooShort(_)
            | Self::InvalidMagic(_)
            | Self::MalformedChunk { .. }
            | Self::MissingSection(_)
            | Self::BinRw(_) => ErrorKind::Format,
            Self::Truncated { .. } | Self::OutOfBounds(_) => ErrorKind::OutOfBounds,
            Self::UnsupportedPackedInt { .. } => ErrorKind::UnsupportedVariant,
            Self::Mesh(e) => e.kind(),
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type for tagfile operations
pub type TagfileResult<T> = Result<T, TagfileError>;
