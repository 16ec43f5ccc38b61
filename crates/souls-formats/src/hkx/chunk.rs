//! Length-prefixed chunk walking
//!
//! Every chunk starts with a big-endian `u32` whose low 24 bits are the total
//! chunk length (header included) and whose high byte carries flags, followed
//! by a 4-byte ASCII tag. Chunks are laid out back to back and may nest.

use super::error::{TagfileError, TagfileResult};
use crate::view::{bytes_at, u32_at};
use binrw::Endian;
use std::borrow::Cow;

/// Size of a chunk header
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Mask selecting the length bits of a chunk header
pub const LENGTH_MASK: u32 = 0x00FF_FFFF;

/// One chunk borrowed from the tagfile buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Absolute offset of the chunk header
    pub offset: usize,
    /// High byte of the length word
    pub flags: u8,
    /// Four-character tag
    pub tag: [u8; 4],
    /// Bytes after the header
    pub payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Total length including the header
    pub fn total_len(&self) -> usize {
        self.payload.len() + CHUNK_HEADER_SIZE
    }

    /// Absolute offset of the payload
    pub fn payload_offset(&self) -> usize {
        self.offset + CHUNK_HEADER_SIZE
    }

    /// Tag as text
    pub fn tag_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.tag)
    }

    /// Chunks nested in the payload
    pub fn children(&self) -> ChunkIter<'a> {
        ChunkIter::new(self.payload, self.payload_offset())
    }
}

/// Read the chunk at `pos` in `region`, whose first byte is at absolute `base`
pub fn read_chunk(region: &[u8], pos: usize, base: usize) -> TagfileResult<Chunk<'_>> {
    let offset = base + pos;
    let available = region.len().saturating_sub(pos);
    if available < CHUNK_HEADER_SIZE {
        return Err(TagfileError::Truncated {
            offset,
            length: CHUNK_HEADER_SIZE,
            available,
        });
    }

    let word = u32_at(region, pos, Endian::Big)?;
    let length = (word & LENGTH_MASK) as usize;
    if length < CHUNK_HEADER_SIZE {
        return Err(TagfileError::MalformedChunk { offset, length });
    }
    if length > available {
        return Err(TagfileError::Truncated {
            offset,
            length,
            available,
        });
    }

    Ok(Chunk {
        offset,
        flags: (word >> 24) as u8,
        tag: bytes_at::<4>(region, pos + 4)?,
        payload: &region[pos + CHUNK_HEADER_SIZE..pos + length],
    })
}

/// Iterator over back-to-back chunks in a region
///
/// Stops after the first error: once a length is wrong nothing after it can be
/// located.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    region: &'a [u8],
    base: usize,
    pos: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    /// Walk `region`, reporting offsets relative to absolute `base`
    pub fn new(region: &'a [u8], base: usize) -> Self {
        Self {
            region,
            base,
            pos: 0,
            failed: false,
        }
    }

    /// Absolute offset the walk has reached
    pub fn position(&self) -> usize {
        self.base + self.pos
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = TagfileResult<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.region.len() {
            return None;
        }
        match read_chunk(self.region, self.pos, self.base) {
            Ok(chunk) => {
                self.pos += chunk.total_len();
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
