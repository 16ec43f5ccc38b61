//! Hex dump formatting for diagnostic output
//!
//! Each line covers 16 bytes:
//!
//! ```text
//! 00000010 | 42 4e 44 33 00 00 00 00 0e 01 01 00 03 00 00 00 | BND3............
//! ```
//!
//! The address column starts at a caller-supplied base so that a dump of a
//! sub-slice shows the offsets of the enclosing file.

use std::io::{self, Write};

/// Number of bytes shown per line
pub const BYTES_PER_LINE: usize = 16;

/// Write a hex dump of `data`, labelling the first byte with address `base`
pub fn write_hexdump<W: Write>(out: &mut W, data: &[u8], base: u64) -> io::Result<()> {
    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let addr = base + (line * BYTES_PER_LINE) as u64;
        write!(out, "{:08x} | ", addr)?;
        for byte in chunk {
            write!(out, "{:02x} ", byte)?;
        }
        for _ in chunk.len()..BYTES_PER_LINE {
            out.write_all(b"   ")?;
        }
        let text: String = chunk.iter().map(|&b| printable(b)).collect();
        writeln!(out, "| {}", text)?;
    }
    Ok(())
}

fn printable(byte: u8) -> char {
    if (0x20..0x7F).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
