//! Packed variable-length integers used by the TYPE section
//!
//! The prefix bits of the first byte select the total length; the remaining
//! bits of the first byte and all following bytes form a big-endian value.
//!
//! | first byte | bytes | value bits |
//! |------------|-------|------------|
//! | `0xxxxxxx` | 1     | 7          |
//! | `10xxxxxx` | 2     | 14         |
//! | `110xxxxx` | 3     | 21         |
//! | `11100xxx` | 4     | 27         |
//! | `11101xxx` | 5     | 35         |
//!
//! Any other prefix is rejected.

use super::error::{TagfileError, TagfileResult};
use crate::view::slice_at;

/// Decode one packed integer at `*offset`, advancing it past the value
///
/// On error `*offset` is left unchanged.
pub fn read_packed(data: &[u8], offset: &mut usize) -> TagfileResult<u64> {
    let start = *offset;
    let first = slice_at(data, start, 1)?[0];

    let (len, high) = match first {
        0x00..=0x7F => (1, first),
        0x80..=0xBF => (2, first & 0x3F),
        0xC0..=0xDF => (3, first & 0x1F),
        0xE0..=0xE7 => (4, first & 0x07),
        0xE8..=0xEF => (5, first & 0x07),
        _ => {
            return Err(TagfileError::UnsupportedPackedInt {
                offset: start,
                byte: first,
            });
        }
    };

    let tail = slice_at(data, start + 1, len - 1)?;
    let value = tail
        .iter()
        .fold(u64::from(high), |acc, &b| (acc << 8) | u64::from(b));
    *offset = start + len;
    Ok(value)
}
