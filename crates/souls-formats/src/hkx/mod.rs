//! HKX TAG0 tagfile
//!
//! A tagfile is one root chunk tagged `TAG0` whose payload is a sequence of
//! top-level sections:
//!
//! - `SDKV`: SDK version string
//! - `DATA`: raw payload; item offsets point into it
//! - `TYPE`: reflected type metadata (see [`types`])
//! - `INDX`: object table, holding `ITEM` (12-byte item records) and `PTCH`
//!
//! Geometry extraction needs only `DATA` and `INDX`. See [`chunk`] for the
//! chunk header layout.

pub mod chunk;
mod dump;
mod error;
mod extract;
mod item;
mod packed;
mod transform;
pub mod types;

pub use chunk::{Chunk, ChunkIter, read_chunk};
pub use dump::{dump_item_table, dump_tagfile};
pub use error::{TagfileError, TagfileResult};
pub use extract::{ExtractOptions, TRANSFORM_OFFSET, extract_geometry, extract_geometry_into};
pub use item::{HkxItem, ITEM_SIZE, ItemRole, parse_items};
pub use packed::read_packed;
pub use transform::Transform;
pub use types::{NameTable, TypeMetadata, UNKNOWN_NAME};

use crate::view::bytes_at;

/// Root chunk tag
pub const TAG0: [u8; 4] = *b"TAG0";
/// SDK version section
pub const SDKV: [u8; 4] = *b"SDKV";
/// Raw payload section
pub const DATA: [u8; 4] = *b"DATA";
/// Type metadata section
pub const TYPE: [u8; 4] = *b"TYPE";
/// Object table section
pub const INDX: [u8; 4] = *b"INDX";
/// Item list inside `INDX`
pub const ITEM: [u8; 4] = *b"ITEM";
/// Patch list inside `INDX`
pub const PTCH: [u8; 4] = *b"PTCH";
/// Type name strings inside `TYPE`
pub const TSTR: [u8; 4] = *b"TSTR";
/// Type names and template parameters inside `TYPE`
pub const TNAM: [u8; 4] = *b"TNAM";
/// Field name strings inside `TYPE`
pub const FSTR: [u8; 4] = *b"FSTR";
/// Type bodies inside `TYPE`
pub const TBOD: [u8; 4] = *b"TBOD";

/// True if `data` carries the TAG0 tag at offset 4
pub fn is_tagfile(data: &[u8]) -> bool {
    data.get(4..8) == Some(&TAG0[..])
}

/// A tagfile whose root chunk has been validated
#[derive(Debug, Clone, Copy)]
pub struct Tagfile<'a> {
    data: &'a [u8],
    root: Chunk<'a>,
}

impl<'a> Tagfile<'a> {
    /// Validate the root chunk
    pub fn parse(data: &'a [u8]) -> TagfileResult<Self> {
        if data.len() < chunk::CHUNK_HEADER_SIZE {
            return Err(TagfileError::TooShort(data.len()));
        }
        let tag = bytes_at::<4>(data, 4)?;
        if tag != TAG0 {
            return Err(TagfileError::InvalidMagic(tag));
        }
        let root = read_chunk(data, 0, 0)?;
        Ok(Self { data, root })
    }

    /// The whole input buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The root chunk
    pub fn root(&self) -> Chunk<'a> {
        self.root
    }

    /// Top-level sections
    pub fn chunks(&self) -> ChunkIter<'a> {
        self.root.children()
    }

    /// The last top-level section with the given tag
    pub fn section(&self, tag: [u8; 4]) -> TagfileResult<Option<Chunk<'a>>> {
        let mut found = None;
        for chunk in self.chunks() {
            let chunk = chunk?;
            if chunk.tag == tag {
                found = Some(chunk);
            }
        }
        Ok(found)
    }

    /// The `DATA` payload
    pub fn payload(&self) -> TagfileResult<&'a [u8]> {
        self.section(DATA)?
            .map(|c| c.payload)
            .ok_or(TagfileError::MissingSection(DATA))
    }

    /// Every item of every `ITEM` list in the `INDX` section
    ///
    /// A file without an `INDX` section has no items.
    pub fn items(&self) -> TagfileResult<Vec<HkxItem>> {
        let Some(index) = self.section(INDX)? else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();
        for child in index.children() {
            let child = child?;
            if child.tag == ITEM {
                items.extend(parse_items(child.payload)?);
            }
        }
        Ok(items)
    }

    /// Decode the `TYPE` section, if present
    pub fn type_metadata(&self) -> TagfileResult<Option<TypeMetadata<'a>>> {
        self.section(TYPE)?
            .map(|section| TypeMetadata::parse(&section))
            .transpose()
    }
}
