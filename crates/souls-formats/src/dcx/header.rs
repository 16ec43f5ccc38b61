//! DCX header structures and parsing

use binrw::BinRead;
use binrw::io::Cursor;

use super::error::{DcxError, DcxResult};

/// DCX magic bytes (only the first three are checked)
pub const DCX_MAGIC: [u8; 3] = *b"DCX";

/// Size of the fixed container header
pub const HEADER_SIZE: usize = 64;

/// Added to the header's stream offset field to get the absolute stream start
pub const STREAM_OFFSET_BIAS: u64 = 0x20;

/// Compression method named by the tag at offset 0x28
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcxMethod {
    /// "DFLT": a single zlib stream
    Deflate,
    /// "EDGE": chunked format, recognized but not supported
    Edge,
    /// Any other tag
    Unknown([u8; 4]),
}

impl DcxMethod {
    /// Classify a method tag
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"DFLT" => Self::Deflate,
            b"EDGE" => Self::Edge,
            _ => Self::Unknown(tag),
        }
    }
}

/// DCX container header (64 bytes, big-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct DcxHeader {
    /// Magic bytes: "DCX\0"
    pub magic: [u8; 4],

    /// Format version
    pub version: u32,

    /// Offsets of the DCS/DCP blocks, unused for decoding
    pub block_offsets: [u32; 3],

    /// Stream start minus [`STREAM_OFFSET_BIAS`]
    pub stream_offset: u32,

    /// Magic bytes: "DCS\0"
    pub dcs_magic: [u8; 4],

    /// Exact size of the decompressed content
    pub uncompressed_size: u32,

    /// Size of the compressed stream
    pub compressed_size: u32,

    /// Magic bytes: "DCP\0"
    pub dcp_magic: [u8; 4],

    /// Compression method tag
    pub method: [u8; 4],

    /// Method parameters (compression level, flags)
    pub method_params: [u8; 20],
}

impl DcxHeader {
    /// Parse the fixed header
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> DcxResult<Self> {
        let header = Self::read(&mut Cursor::new(&bytes[..]))?;
        header.validate()?;
        Ok(header)
    }

    /// Validate the magic bytes
    pub fn validate(&self) -> DcxResult<()> {
        let magic = [self.magic[0], self.magic[1], self.magic[2]];
        if magic != DCX_MAGIC {
            return Err(DcxError::InvalidMagic(magic));
        }
        Ok(())
    }

    /// Compression method of the wrapped stream
    pub fn method(&self) -> DcxMethod {
        DcxMethod::from_tag(self.method)
    }

    /// Absolute offset of the compressed stream
    pub fn stream_start(&self) -> u64 {
        u64::from(self.stream_offset) + STREAM_OFFSET_BIAS
    }

    /// Declared decompressed size
    pub fn decompressed_size(&self) -> usize {
        self.uncompressed_size as usize
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::dcx_header;

    #[test]
    fn test_header_fields() {
        let bytes = dcx_header(*b"DFLT", 1234, 99);
        let header = DcxHeader::parse(&bytes).expect("header should parse");

        assert_eq!(header.method(), DcxMethod::Deflate);
        assert_eq!(header.stream_start(), 0x4C);
        assert_eq!(header.decompressed_size(), 1234);
        assert_eq!(header.compressed_size, 99);
        assert_eq!(&header.dcs_magic, b"DCS\0");
    }

    #[test]
    fn test_only_three_magic_bytes_checked() {
        let mut bytes = dcx_header(*b"DFLT", 1, 1);
        bytes[3] = 0xFF;
        assert!(DcxHeader::parse(&bytes).is_ok());

        bytes[2] = b'Y';
        assert!(matches!(
            DcxHeader::parse(&bytes),
            Err(DcxError::InvalidMagic(m)) if &m == b"DCY"
        ));
    }

    #[test]
    fn test_method_classification() {
        assert_eq!(DcxMethod::from_tag(*b"EDGE"), DcxMethod::Edge);
        assert_eq!(
            DcxMethod::from_tag(*b"KRAK"),
            DcxMethod::Unknown(*b"KRAK")
        );
    }
}
