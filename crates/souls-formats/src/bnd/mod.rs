//! BND3 combined archive
//!
//! A single file holding a header, a record table and the entry bytes. The
//! big-endian flags word at offset 12 selects one of several historical
//! layouts, which fixes the record stride, the byte order of everything after
//! the flags, and whether records carry names (see [`KNOWN_LAYOUTS`]).
//!
//! ```text
//! 0x00  "BND3"
//! 0x04  version string (8 bytes)
//! 0x0C  flags (big-endian)
//! 0x10  file count (archive byte order)
//! 0x20  records, `stride` bytes each:
//!         +0x00 flags  +0x04 size  +0x08 data offset
//!         +0x0C id     +0x10 name offset  (strides 0x14 and up)
//!         +0x14 uncompressed size         (stride 0x18)
//! ```
//!
//! A BND3 archive may itself be wrapped in a DCX container; [`BndArchive`]
//! inflates it transparently.

mod error;
mod layout;

pub use error::{BndError, BndResult};
pub use layout::{BndLayout, BndRecord, EntryIdentity, KNOWN_LAYOUTS};

use crate::dcx::{self, DCX_MAGIC};
use crate::entry::{ArchiveEntry, decode_name};
use crate::view::{bytes_at, cstr_at, record_offset, slice_at, u32_at};
use binrw::io::Cursor;
use binrw::{BinRead, Endian};
use std::path::Path;
use tracing::debug;

/// BND3 magic bytes
pub const BND3_MAGIC: [u8; 4] = *b"BND3";

/// Offset of the flags word
pub const FLAGS_OFFSET: usize = 12;

/// Offset of the file count
pub const COUNT_OFFSET: usize = 16;

/// Offset of the first record
pub const RECORD_BASE: usize = 0x20;

/// A loaded BND3 archive
#[derive(Debug, Clone)]
pub struct BndArchive {
    data: Vec<u8>,
    layout: BndLayout,
    file_count: u32,
    inflated: bool,
}

impl BndArchive {
    /// Open a BND3 file, inflating it first if it is DCX-wrapped
    pub fn open(path: impl AsRef<Path>) -> BndResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| BndError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    /// Parse an archive from bytes, inflating them first if DCX-wrapped
    pub fn from_bytes(data: Vec<u8>) -> BndResult<Self> {
        let (data, inflated) = if data.starts_with(&DCX_MAGIC) {
            debug!("BND3 archive is DCX-wrapped, inflating");
            (dcx::decompress_bytes(&data)?, true)
        } else {
            (data, false)
        };

        let magic = bytes_at::<4>(&data, 0)?;
        if magic != BND3_MAGIC {
            return Err(BndError::InvalidMagic(magic));
        }

        let flags = u32_at(&data, FLAGS_OFFSET, Endian::Big)?;
        let layout = BndLayout::from_flags(flags).ok_or(BndError::UnsupportedFlags(flags))?;
        let file_count = u32_at(&data, COUNT_OFFSET, layout.endian)?;

        // The whole record table must lie inside the buffer
        let table_len = (file_count as usize)
            .checked_mul(layout.stride)
            .unwrap_or(usize::MAX);
        slice_at(&data, RECORD_BASE, table_len)?;

        debug!(
            "BND3 flags 0x{:08X}: stride 0x{:X}, {:?}-endian, {:?}, {} entries",
            flags, layout.stride, layout.endian, layout.identity, file_count
        );
        Ok(Self {
            data,
            layout,
            file_count,
            inflated,
        })
    }

    /// Layout selected by the flags word
    pub fn layout(&self) -> BndLayout {
        self.layout
    }

    /// Number of entries
    pub fn file_count(&self) -> u32 {
        self.file_count
    }

    /// True if the archive was DCX-wrapped on input
    pub fn was_inflated(&self) -> bool {
        self.inflated
    }

    /// The (inflated) archive bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw record for entry `index`
    pub fn record(&self, index: u32) -> BndResult<BndRecord> {
        if index >= self.file_count {
            return Err(BndError::IndexOutOfRange {
                index,
                count: self.file_count,
            });
        }
        let stride = self.layout.stride;
        let offset = record_offset(RECORD_BASE, index as usize, stride).unwrap_or(usize::MAX);
        let raw = slice_at(&self.data, offset, stride)?;
        Ok(BndRecord::read_options(
            &mut Cursor::new(raw),
            self.layout.endian,
            (stride,),
        )?)
    }

    /// Entry `index`: its name (if the layout stores names) and its bytes
    pub fn entry(&self, index: u32) -> BndResult<ArchiveEntry<'_>> {
        let record = self.record(index)?;
        let data = slice_at(
            &self.data,
            record.data_offset as usize,
            record.size as usize,
        )?;
        let name = match (self.layout.identity, record.name_offset) {
            (EntryIdentity::Named, Some(offset)) => {
                Some(decode_name(cstr_at(&self.data, offset as usize)?))
            }
            _ => None,
        };
        Ok(ArchiveEntry { index, name, data })
    }

    /// All entries in record order; each one fails independently
    pub fn entries(&self) -> impl Iterator<Item = BndResult<ArchiveEntry<'_>>> {
        (0..self.file_count).map(move |i| self.entry(i))
    }
}
