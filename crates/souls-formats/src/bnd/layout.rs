//! BND3 record layouts selected by the header flags

use binrw::{BinRead, Endian};

/// How entries are identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryIdentity {
    /// Each record carries a name offset
    Named,
    /// Records carry no name; entries are known by position
    Sequential,
}

/// Record layout for one flags value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BndLayout {
    /// Flags value at offset 12 (read big-endian)
    pub flags: u32,
    /// Size of one record
    pub stride: usize,
    /// Byte order of the file count and records
    pub endian: Endian,
    /// Whether records carry names
    pub identity: EntryIdentity,
}

/// Every layout this reader understands
pub const KNOWN_LAYOUTS: [BndLayout; 5] = [
    BndLayout::new(0x7000_0000, 0x14, Endian::Little, EntryIdentity::Named),
    BndLayout::new(0x7400_0000, 0x18, Endian::Little, EntryIdentity::Named),
    BndLayout::new(0x0001_0100, 0x0C, Endian::Big, EntryIdentity::Sequential),
    BndLayout::new(0x0E01_0100, 0x14, Endian::Big, EntryIdentity::Named),
    BndLayout::new(0x2E01_0100, 0x18, Endian::Big, EntryIdentity::Named),
];

impl BndLayout {
    const fn new(flags: u32, stride: usize, endian: Endian, identity: EntryIdentity) -> Self {
        Self {
            flags,
            stride,
            endian,
            identity,
        }
    }

    /// Look up the layout for an exact flags value
    pub fn from_flags(flags: u32) -> Option<Self> {
        KNOWN_LAYOUTS.iter().copied().find(|l| l.flags == flags)
    }

    /// True if records carry names
    pub fn has_names(&self) -> bool {
        self.identity == EntryIdentity::Named
    }
}

/// One BND3 record; trailing fields exist only for the wider strides
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(import(stride: usize))]
pub struct BndRecord {
    /// Per-entry flags
    pub flags: u32,

    /// Stored size
    pub size: u32,

    /// Offset of the entry bytes from the start of the archive
    pub data_offset: u32,

    /// Entry id
    #[br(if(stride >= 0x14))]
    pub id: Option<u32>,

    /// Absolute offset of the NUL-terminated name
    #[br(if(stride >= 0x14))]
    pub name_offset: Option<u32>,

    /// Size after decompression
    #[br(if(stride >= 0x18))]
    pub uncompressed_size: Option<u32>,
}
