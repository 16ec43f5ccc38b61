//! DCX container format
//!
//! A DCX file is a fixed 64-byte big-endian header followed by one compressed
//! stream. The header names the compression method and the exact size of the
//! decompressed content.
//!
//! # Structure
//!
//! ```text
//! 0x00  "DCX\0"
//! 0x14  u32 stream offset (stream starts at value + 0x20)
//! 0x18  "DCS\0"
//! 0x1C  u32 decompressed size
//! 0x20  u32 compressed size
//! 0x24  "DCP\0"
//! 0x28  method tag ("DFLT" or "EDGE")
//! ```
//!
//! Only "DFLT" (a zlib stream) is decoded. "EDGE" is recognized and rejected
//! as unsupported.

mod error;
mod header;
mod inflate;

pub use error::{DcxError, DcxResult};
pub use header::{DCX_MAGIC, DcxHeader, DcxMethod, HEADER_SIZE, STREAM_OFFSET_BIAS};
pub use inflate::{INPUT_CHUNK_SIZE, inflate_exact};

use crate::source::{ByteSource, MemorySource, StreamSource};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Check if data looks like a DCX container
pub fn is_dcx(data: &[u8]) -> bool {
    data.len() >= HEADER_SIZE && data.starts_with(&DCX_MAGIC)
}

/// Read the header and inflate the stream from any byte source
pub fn decompress(source: &mut dyn ByteSource) -> DcxResult<Vec<u8>> {
    let mut raw = [0u8; HEADER_SIZE];
    let available = source.read_full(&mut raw)?;
    if available < HEADER_SIZE {
        return Err(DcxError::TruncatedHeader { available });
    }

    let header = DcxHeader::parse(&raw)?;
    match header.method() {
        DcxMethod::Deflate => {}
        DcxMethod::Edge => return Err(DcxError::UnsupportedMethod(header.method)),
        DcxMethod::Unknown(tag) => return Err(DcxError::UnknownMethod(tag)),
    }

    let start = header.stream_start();
    let expected = header.decompressed_size();
    debug!(
        "DCX stream at 0x{:X}: {} -> {} bytes",
        start, header.compressed_size, expected
    );

    source.seek(start)?;
    inflate_exact(source, expected)
}

/// Inflate a DCX container held in memory
pub fn decompress_bytes(data: &[u8]) -> DcxResult<Vec<u8>> {
    decompress(&mut MemorySource::new(data))
}

/// Inflate a DCX container file
pub fn decompress_file(path: impl AsRef<Path>) -> DcxResult<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DcxError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    decompress(&mut StreamSource::new(BufReader::new(file)))
}
