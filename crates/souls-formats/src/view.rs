//! Bounds-checked reads from borrowed byte buffers
//!
//! Archive records, chunk headers and tagfile items all carry offsets taken
//! from untrusted input. Every read goes through these helpers, which validate
//! `offset + len` against the owning buffer and fail with [`OutOfBounds`]
//! rather than panicking on a bad index.

use crate::error::OutOfBounds;
use binrw::Endian;

/// Borrow `len` bytes starting at `offset`
pub fn slice_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], OutOfBounds> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(OutOfBounds {
            offset,
            len,
            available: buf.len(),
        })
}

/// Copy a fixed number of bytes starting at `offset`
pub fn bytes_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], OutOfBounds> {
    let src = slice_at(buf, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(src);
    Ok(out)
}

/// Read a `u16` with the given byte order
pub fn u16_at(buf: &[u8], offset: usize, endian: Endian) -> Result<u16, OutOfBounds> {
    let bytes = bytes_at::<2>(buf, offset)?;
    Ok(match endian {
        Endian::Big => u16::from_be_bytes(bytes),
        Endian::Little => u16::from_le_bytes(bytes),
    })
}

/// Read a `u32` with the given byte order
pub fn u32_at(buf: &[u8], offset: usize, endian: Endian) -> Result<u32, OutOfBounds> {
    let bytes = bytes_at::<4>(buf, offset)?;
    Ok(match endian {
        Endian::Big => u32::from_be_bytes(bytes),
        Endian::Little => u32::from_le_bytes(bytes),
    })
}

/// Read an IEEE-754 `f32` with the given byte order
pub fn f32_at(buf: &[u8], offset: usize, endian: Endian) -> Result<f32, OutOfBounds> {
    u32_at(buf, offset, endian).map(f32::from_bits)
}

/// Borrow a NUL-terminated string starting at `offset`, without the NUL
///
/// The terminator must lie inside the buffer; a string running off the end is
/// reported as out of bounds.
pub fn cstr_at(buf: &[u8], offset: usize) -> Result<&[u8], OutOfBounds> {
    let tail = buf.get(offset..).ok_or(OutOfBounds {
        offset,
        len: 1,
        available: buf.len(),
    })?;
    let end = tail.iter().position(|&b| b == 0).ok_or(OutOfBounds {
        offset,
        len: tail.len() + 1,
        available: buf.len(),
    })?;
    Ok(&tail[..end])
}

/// Compute `base + index * stride` without overflowing
pub(crate) fn record_offset(base: usize, index: usize, stride: usize) -> Option<usize> {
    index.checked_mul(stride)?.checked_add(base)
}
