//! Synthetic fixture files shared by the integration tests

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

/// Wrap `data` in a DFLT DCX container with the stream at 0x4C
pub fn dcx_wrap(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    let stream = encoder.finish().unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(b"DCX\0");
    for v in [0x0001_0000u32, 0x18, 0x24, 0x24, 0x2C] {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out.extend_from_slice(b"DCS\0");
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&(stream.len() as u32).to_be_bytes());
    out.extend_from_slice(b"DCP\0");
    out.extend_from_slice(b"DFLT");
    out.extend_from_slice(&0x20u32.to_be_bytes());
    out.resize(0x44, 0);
    out.extend_from_slice(b"DCA\0");
    out.extend_from_slice(&8u32.to_be_bytes());
    out.extend_from_slice(&stream);
    out
}

/// BHF3 index and BDF3 data bytes for `files`
pub fn split_archive(files: &[(&str, &[u8])]) -> (Vec<u8>, Vec<u8>) {
    let mut index = b"BHF3".to_vec();
    index.extend_from_slice(b"07D7R6\0\0");
    index.extend_from_slice(&0x54u32.to_le_bytes());
    index.extend_from_slice(&(files.len() as u32).to_le_bytes());
    index.resize(0x20, 0);

    let mut data = b"BDF3".to_vec();
    data.resize(0x10, 0);

    let mut name_offset = 0x20 + files.len() * 0x18;
    let mut names = Vec::new();
    for (i, (name, bytes)) in files.iter().enumerate() {
        let record = [
            0x40,
            bytes.len() as u32,
            data.len() as u32,
            i as u32,
            name_offset as u32,
            bytes.len() as u32,
        ];
        index.extend(record.iter().flat_map(|v| v.to_le_bytes()));
        data.extend_from_slice(bytes);
        names.extend_from_slice(name.as_bytes());
        names.push(0);
        name_offset += name.len() + 1;
    }
    index.extend_from_slice(&names);
    (index, data)
}

/// Little-endian BND3 archive (flags 0x74000000, 0x18-byte records)
pub fn bnd3(files: &[(&str, &[u8])]) -> Vec<u8> {
    let table_end = 0x20 + files.len() * 0x18;
    let names_len: usize = files.iter().map(|(n, _)| n.len() + 1).sum();

    let mut out = b"BND3".to_vec();
    out.extend_from_slice(b"07D7R6\0\0");
    out.extend_from_slice(&0x7400_0000u32.to_be_bytes());
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.resize(0x20, 0);

    let mut name_offset = table_end;
    let mut data_offset = table_end + names_len;
    for (i, (name, bytes)) in files.iter().enumerate() {
        let record = [
            0x40,
            bytes.len() as u32,
            data_offset as u32,
            i as u32,
            name_offset as u32,
            bytes.len() as u32,
        ];
        out.extend(record.iter().flat_map(|v| v.to_le_bytes()));
        name_offset += name.len() + 1;
        data_offset += bytes.len();
    }
    for (name, _) in files {
        out.extend_from_slice(name.as_bytes());
        out.push(0);
    }
    for (_, bytes) in files {
        out.extend_from_slice(bytes);
    }
    out
}

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out
}

/// TAG0 file with the given DATA payload and `(raw_type, offset, count)` items
pub fn tagfile(data: &[u8], items: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut body = chunk(b"SDKV", b"20180100");
    body.extend(chunk(b"DATA", data));
    let records: Vec<u8> = items
        .iter()
        .flat_map(|&(t, o, c)| [t, o, c])
        .flat_map(u32::to_le_bytes)
        .collect();
    body.extend(chunk(b"INDX", &chunk(b"ITEM", &records)));

    let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(b"TAG0");
    out.extend(body);
    out
}

/// Little-endian float bytes
pub fn floats(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Little-endian u16 bytes
pub fn shorts(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// A tagfile with an identity transform item at 0, two vertices at 0x200
/// and one triangle (0, 1, 0) at 0x300
pub fn two_vertex_tagfile() -> Vec<u8> {
    let mut data = vec![0u8; 0x308];
    data[0x170..0x1B0].copy_from_slice(&floats(&IDENTITY));
    data[0x200..0x220].copy_from_slice(&floats(&[1.0, 2.0, 3.0, 1.0, 4.0, 5.0, 6.0, 1.0]));
    data[0x300..0x308].copy_from_slice(&shorts(&[0, 1, 0, 0]));
    tagfile(
        &data,
        &[
            (0x1000_004B, 0, 1),
            (0x2000_0016, 0x200, 2),
            (0x2000_000D, 0x300, 4),
        ],
    )
}
