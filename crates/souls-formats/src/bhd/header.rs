//! BHF3 index header and record structures

use binrw::BinRead;

/// Index file magic
pub const INDEX_MAGIC: [u8; 4] = *b"BHF3";

/// Data file magic
pub const DATA_MAGIC: [u8; 4] = *b"BDF3";

/// Minimum index file length (the fixed header)
pub const INDEX_HEADER_SIZE: usize = 0x20;

/// Minimum data file length
pub const DATA_HEADER_SIZE: usize = 0x10;

/// Offset of the first record in the index
pub const RECORD_BASE: usize = 0x20;

/// Size of one record
pub const RECORD_SIZE: usize = 0x18;

/// BHF3 index header (32 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BhdHeader {
    /// Magic bytes: "BHF3"
    pub magic: [u8; 4],

    /// Version string, usually a date
    pub version: [u8; 8],

    /// Format flags
    pub flags: u32,

    /// Number of records
    pub file_count: u32,

    /// Padding
    pub reserved: [u8; 12],
}

/// One index record (24 bytes, little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BhdRecord {
    /// Per-entry flags
    pub flags: u32,

    /// Stored size in the data file
    pub size: u32,

    /// Offset of the entry bytes in the data file
    pub data_offset: u32,

    /// Entry id
    pub id: u32,

    /// Absolute offset of the NUL-terminated name in the index
    pub name_offset: u32,

    /// Size after decompression
    pub uncompressed_size: u32,
}
