//! Error classification shared by every format module

use thiserror::Error;

/// Broad failure category of a format error
///
/// Each format module has its own error enum; `kind()` on those enums maps
/// every variant onto one of these categories so batch callers can decide how
/// to report a failure without matching on each format's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Open, read or seek failure on the underlying file or stream
    Io,
    /// Bad magic, bad method tag, or sizes inconsistent with the content
    Format,
    /// Recognized but unimplemented variant (compression method, layout flags)
    UnsupportedVariant,
    /// A declared chunk, record or item extends past its owning buffer
    OutOfBounds,
    /// Allocation failure while sizing or growing a buffer
    OutOfMemory,
}

/// A read that would extend past the end of its owning buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read of {len} bytes at offset 0x{offset:X} exceeds buffer of {available} bytes")]
pub struct OutOfBounds {
    /// Offset of the attempted read
    pub offset: usize,
    /// Number of bytes requested
    pub len: usize,
    /// Size of the buffer the read was checked against
    pub available: usize,
}
