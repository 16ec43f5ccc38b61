//! Byte sources for sequential decoding
//!
//! The DCX decoder reads its header and then streams the compressed body in
//! fixed-size chunks. It does so through [`ByteSource`], which has exactly two
//! implementations: [`MemorySource`] over a borrowed buffer (an archive entry
//! already loaded) and [`StreamSource`] over any seekable reader (a file on
//! disk). Decoders take `&mut dyn ByteSource` and never see which one they
//! were given.

use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

/// Errors raised when repositioning a source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Seek target lies past the end of an in-memory source
    #[error("cannot seek to {pos}: source is only {len} bytes long")]
    SeekPastEnd {
        /// Requested position
        pos: u64,
        /// Total length of the source
        len: u64,
    },

    /// The underlying stream rejected the seek
    #[error("seek failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Uniform read/seek capability over memory or a stream
pub trait ByteSource {
    /// Read up to `buf.len()` bytes
    ///
    /// Returns fewer bytes only at end of input, and `Ok(0)` once exhausted.
    /// An I/O failure is reported as `Err`, never as a short read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Move the read position to `pos` bytes from the start
    ///
    /// A failed seek leaves the position unchanged.
    fn seek(&mut self, pos: u64) -> SourceResult<()>;

    /// Read until `buf` is full or the input ends, returning the byte count
    fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}

/// Source backed by a borrowed in-memory buffer
#[derive(Debug, Clone)]
pub struct MemorySource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemorySource<'a> {
    /// Create a source positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ByteSource for MemorySource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }

    fn seek(&mut self, pos: u64) -> SourceResult<()> {
        let len = self.data.len() as u64;
        if pos > len {
            return Err(SourceError::SeekPastEnd { pos, len });
        }
        // pos <= len, which fits in usize
        self.pos = pos as usize;
        Ok(())
    }
}

/// Source backed by a seekable reader such as an open file
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: R,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                other => return other,
            }
        }
    }

    fn seek(&mut self, pos: u64) -> SourceResult<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}
