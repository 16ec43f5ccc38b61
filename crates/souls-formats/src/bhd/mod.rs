//! BHF3/BDF3 split archive
//!
//! The archive is stored as two files: an index (`BHF3`) holding a fixed
//! header, a table of 24-byte records and the entry names, and a data file
//! (`BDF3`) holding the raw entry bytes. Record `i` lives at
//! `0x20 + i * 0x18` in the index; all fields are little-endian.
//!
//! ```text
//! +0x00 flags
//! +0x04 size
//! +0x08 data offset     (into the data file)
//! +0x0C id
//! +0x10 name offset     (into the index file)
//! +0x14 uncompressed size
//! ```
//!
//! Entries borrow from the archive's buffers; nothing is copied.

mod error;
mod header;

pub use error::{BhdError, BhdResult};
pub use header::{
    BhdHeader, BhdRecord, DATA_HEADER_SIZE, DATA_MAGIC, INDEX_HEADER_SIZE, INDEX_MAGIC,
    RECORD_BASE, RECORD_SIZE,
};

use crate::entry::{ArchiveEntry, decode_name};
use crate::view::{cstr_at, record_offset, slice_at};
use binrw::BinRead;
use binrw::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Derive the data file path from the index file path
///
/// The last three characters of the file name are replaced with `bdt`, so
/// `m10.hkxbhd` pairs with `m10.hkxbdt`. Returns `None` if the file name is
/// missing, not valid UTF-8, or shorter than three characters.
pub fn data_path_for(index_path: &Path) -> Option<PathBuf> {
    let name = index_path.file_name()?.to_str()?;
    let (cut, _) = name.char_indices().rev().nth(2)?;
    Some(index_path.with_file_name(format!("{}bdt", &name[..cut])))
}

/// A loaded split archive
#[derive(Debug, Clone)]
pub struct BhdArchive {
    header: BhdHeader,
    index: Vec<u8>,
    data: Vec<u8>,
}

impl BhdArchive {
    /// Open an index file and its derived data file
    pub fn open(index_path: impl AsRef<Path>) -> BhdResult<Self> {
        let index_path = index_path.as_ref();
        let index = read_file(index_path)?;
        Self::open_with_index(index_path, index)
    }

    /// Open an archive whose index file has already been read into `index`
    ///
    /// Only the data file next to `index_path` is read from disk.
    pub fn open_with_index(index_path: impl AsRef<Path>, index: Vec<u8>) -> BhdResult<Self> {
        let index_path = index_path.as_ref();
        let data_path =
            data_path_for(index_path).ok_or_else(|| BhdError::BadPath(index_path.to_path_buf()))?;

        check_magic(&index, "index", INDEX_MAGIC, INDEX_HEADER_SIZE)?;
        let data = read_file(&data_path)?;

        debug!(
            "opened split archive {} + {}",
            index_path.display(),
            data_path.display()
        );
        Self::from_bytes(index, data)
    }

    /// Build an archive from index and data buffers already in memory
    pub fn from_bytes(index: Vec<u8>, data: Vec<u8>) -> BhdResult<Self> {
        check_magic(&index, "index", INDEX_MAGIC, INDEX_HEADER_SIZE)?;
        check_magic(&data, "data", DATA_MAGIC, DATA_HEADER_SIZE)?;

        let header = BhdHeader::read(&mut Cursor::new(&index[..INDEX_HEADER_SIZE]))?;

        // The whole record table must lie inside the index
        let count = header.file_count as usize;
        let table_len = count.checked_mul(RECORD_SIZE).unwrap_or(usize::MAX);
        slice_at(&index, RECORD_BASE, table_len)?;

        debug!("split archive has {} entries", header.file_count);
        Ok(Self {
            header,
            index,
            data,
        })
    }

    /// Parsed index header
    pub fn header(&self) -> &BhdHeader {
        &self.header
    }

    /// Number of entries
    pub fn file_count(&self) -> u32 {
        self.header.file_count
    }

    /// Raw record for entry `index`
    pub fn record(&self, index: u32) -> BhdResult<BhdRecord> {
        let count = self.file_count();
        if index >= count {
            return Err(BhdError::IndexOutOfRange { index, count });
        }
        let offset = record_offset(RECORD_BASE, index as usize, RECORD_SIZE).unwrap_or(usize::MAX);
        let raw = slice_at(&self.index, offset, RECORD_SIZE)?;
        Ok(BhdRecord::read(&mut Cursor::new(raw))?)
    }

    /// Entry `index`: its name and a view of its bytes in the data file
    pub fn entry(&self, index: u32) -> BhdResult<ArchiveEntry<'_>> {
        let record = self.record(index)?;
        let data = slice_at(
            &self.data,
            record.data_offset as usize,
            record.size as usize,
        )?;
        let name = cstr_at(&self.index, record.name_offset as usize)?;
        Ok(ArchiveEntry {
            index,
            name: Some(decode_name(name)),
            data,
        })
    }

    /// All entries in record order; each one fails independently
    pub fn entries(&self) -> impl Iterator<Item = BhdResult<ArchiveEntry<'_>>> {
        (0..self.file_count()).map(move |i| self.entry(i))
    }
}

fn read_file(path: &Path) -> BhdResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| BhdError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn check_magic(
    buf: &[u8],
    part: &'static str,
    magic: [u8; 4],
    min: usize,
) -> BhdResult<()> {
    if buf.len() < min {
        return Err(BhdError::TooShort {
            part,
            len: buf.len(),
            min,
        });
    }
    let actual = [buf[0], buf[1], buf[2], buf[3]];
    if actual != magic {
        return Err(BhdError::InvalidMagic {
            part,
            expected: if part == "index" { "BHF3" } else { "BDF3" },
            actual,
        });
    }
    Ok(())
}
