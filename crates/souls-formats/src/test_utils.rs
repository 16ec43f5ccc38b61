//! Fixture builders for unit tests
//!
//! Everything here produces synthetic files in the exact on-disk layouts the
//! parsers expect, so tests never depend on game data.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

/// Compress `data` as a zlib stream
pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A 64-byte DCX header whose stream starts at 0x4C
pub fn dcx_header(method: [u8; 4], uncompressed: u32, compressed: u32) -> [u8; 64] {
    let mut h = [0u8; 64];
    h[0x00..0x04].copy_from_slice(b"DCX\0");
    h[0x04..0x08].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    h[0x08..0x0C].copy_from_slice(&0x18u32.to_be_bytes());
    h[0x0C..0x10].copy_from_slice(&0x24u32.to_be_bytes());
    h[0x10..0x14].copy_from_slice(&0x24u32.to_be_bytes());
    h[0x14..0x18].copy_from_slice(&0x2Cu32.to_be_bytes());
    h[0x18..0x1C].copy_from_slice(b"DCS\0");
    h[0x1C..0x20].copy_from_slice(&uncompressed.to_be_bytes());
    h[0x20..0x24].copy_from_slice(&compressed.to_be_bytes());
    h[0x24..0x28].copy_from_slice(b"DCP\0");
    h[0x28..0x2C].copy_from_slice(&method);
    h[0x2C..0x30].copy_from_slice(&0x20u32.to_be_bytes());
    h[0x30] = 9;
    h
}

/// Wrap `data` in a DFLT DCX container
pub fn dcx_wrap(data: &[u8]) -> Vec<u8> {
    let stream = zlib(data);
    let mut out = dcx_header(*b"DFLT", data.len() as u32, stream.len() as u32).to_vec();
    // DCP parameters run to 0x44, then the DCA block
    out.resize(0x44, 0);
    out.extend_from_slice(b"DCA\0");
    out.extend_from_slice(&8u32.to_be_bytes());
    out.extend_from_slice(&stream);
    out
}

/// A BHF3 index and BDF3 data file holding `files` in order
pub fn bhd_pair(files: &[(&str, &[u8])]) -> (Vec<u8>, Vec<u8>) {
    let mut index = Vec::new();
    index.extend_from_slice(b"BHF3");
    index.extend_from_slice(b"07D7R6\0\0");
    index.extend_from_slice(&0x54u32.to_le_bytes());
    index.extend_from_slice(&(files.len() as u32).to_le_bytes());
    index.resize(0x20, 0);

    let mut data = b"BDF3".to_vec();
    data.extend_from_slice(b"07D7R6\0\0");
    data.resize(0x10, 0);

    let mut name_offset = 0x20 + files.len() * 0x18;
    let mut names = Vec::new();
    for (i, (name, bytes)) in files.iter().enumerate() {
        for field in [
            0x40,
            bytes.len() as u32,
            data.len() as u32,
            i as u32,
            name_offset as u32,
            bytes.len() as u32,
        ] {
            index.extend_from_slice(&field.to_le_bytes());
        }
        data.extend_from_slice(bytes);
        names.extend_from_slice(name.as_bytes());
        names.push(0);
        name_offset += name.len() + 1;
    }
    index.extend_from_slice(&names);
    (index, data)
}

/// A BND3 archive with the given flags, laid out for the matching layout
///
/// Unknown flags still produce a little-endian, stride 0x14 file so that the
/// flags check is what fails.
pub fn bnd3(flags: u32, files: &[(&str, &[u8])]) -> Vec<u8> {
    let (stride, little) = match flags {
        0x7000_0000 => (0x14, true),
        0x7400_0000 => (0x18, true),
        0x0001_0100 => (0x0C, false),
        0x0E01_0100 => (0x14, false),
        0x2E01_0100 => (0x18, false),
        _ => (0x14, true),
    };
    let put = |out: &mut Vec<u8>, v: u32| {
        if little {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    };

    let table_end = 0x20 + files.len() * stride;
    let names_len: usize = if stride >= 0x14 {
        files.iter().map(|(n, _)| n.len() + 1).sum()
    } else {
        0
    };

    let mut out = Vec::new();
    out.extend_from_slice(b"BND3");
    out.extend_from_slice(b"07D7R6\0\0");
    out.extend_from_slice(&flags.to_be_bytes());
    put(&mut out, files.len() as u32);
    put(&mut out, (table_end + names_len) as u32);
    out.resize(0x20, 0);

    let mut name_offset = table_end;
    let mut data_offset = table_end + names_len;
    for (i, (name, bytes)) in files.iter().enumerate() {
        put(&mut out, 0x40);
        put(&mut out, bytes.len() as u32);
        put(&mut out, data_offset as u32);
        if stride >= 0x14 {
            put(&mut out, i as u32);
            put(&mut out, name_offset as u32);
            name_offset += name.len() + 1;
        }
        if stride >= 0x18 {
            put(&mut out, bytes.len() as u32);
        }
        data_offset += bytes.len();
    }
    if stride >= 0x14 {
        for (name, _) in files {
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }
    }
    for (_, bytes) in files {
        out.extend_from_slice(bytes);
    }
    out
}

/// One tagfile chunk; leaf chunks carry 0x40 in the flag byte
pub fn chunk(tag: &[u8; 4], payload: &[u8], leaf: bool) -> Vec<u8> {
    let len = (payload.len() + 8) as u32;
    let flags: u32 = if leaf { 0x4000_0000 } else { 0 };
    let mut out = (len | flags).to_be_bytes().to_vec();
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out
}

/// Little-endian bytes of a float sequence
pub fn f32s(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encode a value in the tagfile packed integer format
pub fn packed(value: u64) -> Vec<u8> {
    match value {
        0..=0x7F => vec![value as u8],
        0x80..=0x3FFF => vec![0x80 | (value >> 8) as u8, value as u8],
        0x4000..=0x1F_FFFF => vec![0xC0 | (value >> 16) as u8, (value >> 8) as u8, value as u8],
        0x20_0000..=0x7FF_FFFF => {
            let mut out = vec![0xE0 | (value >> 24) as u8];
            out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
            out
        }
        _ => {
            let mut out = vec![0xE8 | (value >> 32) as u8];
            out.extend_from_slice(&(value as u32).to_be_bytes());
            out
        }
    }
}

/// Concatenate packed encodings of `values`
pub fn packed_all(values: &[u64]) -> Vec<u8> {
    values.iter().flat_map(|&v| packed(v)).collect()
}

/// Builds a TAG0 file from a DATA payload, ITEM records and TYPE chunks
#[derive(Debug, Default)]
pub struct TagfileBuilder {
    data: Vec<u8>,
    items: Vec<[u32; 3]>,
    type_chunks: Vec<Vec<u8>>,
}

impl TagfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `bytes` at `offset` in the DATA payload, growing it as needed
    pub fn data_at(mut self, offset: usize, bytes: &[u8]) -> Self {
        if self.data.len() < offset + bytes.len() {
            self.data.resize(offset + bytes.len(), 0);
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn item(mut self, raw_type: u32, offset: u32, count: u32) -> Self {
        self.items.push([raw_type, offset, count]);
        self
    }

    /// Add a nested TYPE chunk (TSTR, TNAM, ...)
    pub fn type_chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.type_chunks.push(chunk(tag, payload, true));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = chunk(b"SDKV", b"20180100", true);
        body.extend(chunk(b"DATA", &self.data, true));
        if !self.type_chunks.is_empty() {
            body.extend(chunk(b"TYPE", &self.type_chunks.concat(), false));
        }
        let items: Vec<u8> = self
            .items
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut index = chunk(b"ITEM", &items, true);
        index.extend(chunk(b"PTCH", &[], true));
        body.extend(chunk(b"INDX", &index, false));

        let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(b"TAG0");
        out.extend(body);
        out
    }
}

/// Row-major 4x4 matrix with the given translation
pub fn translation_matrix(x: f32, y: f32, z: f32) -> [f32; 16] {
    let mut m = [0.0f32; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

/// Vertex records: x, y, z plus an unused fourth float
pub fn vertex_records(vertices: &[[f32; 3]]) -> Vec<u8> {
    vertices
        .iter()
        .flat_map(|&[x, y, z]| f32s(&[x, y, z, 1.0]))
        .collect()
}

/// Index records: three u16 indices plus one unused u16 per triangle
pub fn index_records(triangles: &[[u16; 3]]) -> Vec<u8> {
    triangles
        .iter()
        .flat_map(|&[a, b, c]| [a, b, c, 0])
        .flat_map(u16::to_le_bytes)
        .collect()
}
