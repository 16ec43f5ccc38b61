//! Diagnostic text dump of a tagfile
//!
//! Every top-level section is printed as a header line and a hex dump. The
//! object table additionally gets an item table, and the TYPE section is
//! decoded into its type names, template parameters and type bodies. Names
//! that cannot be resolved print as `?`; a sub-chunk that fails
//! to decode is reported and skipped.

use std::io::Write;

use tracing::warn;

use super::chunk::Chunk;
use super::error::TagfileResult;
use super::item::parse_items;
use super::types::{
    NameTable, TypeBody, TypeName, parse_type_bodies, parse_type_names, resolve_type_name,
};
use super::{FSTR, INDX, ITEM, TBOD, TNAM, TSTR, TYPE, Tagfile};
use crate::hexdump::write_hexdump;

const BANNER: &str =
    "=============================================================================";

/// Write the full diagnostic dump of one tagfile
///
/// A chunk walk error is printed and then returned; everything read before
/// it has already been written.
pub fn dump_tagfile<W: Write>(out: &mut W, data: &[u8], name: &str) -> TagfileResult<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "== {name}")?;
    writeln!(out, "{BANNER}")?;

    let tagfile = Tagfile::parse(data)?;
    for section in tagfile.chunks() {
        let section = match section {
            Ok(section) => section,
            Err(e) => {
                writeln!(out, "\nerror: {e}")?;
                return Err(e);
            }
        };

        writeln!(out)?;
        writeln!(
            out,
            "{:08x} {} len={} (0x{:x})",
            section.offset,
            section.tag_str(),
            section.payload.len(),
            section.payload.len()
        )?;
        write_hexdump(out, section.payload, section.payload_offset() as u64)?;

        match section.tag {
            INDX => dump_item_table(out, &section)?,
            TYPE => dump_type_section(out, &section)?,
            _ => {}
        }
    }

    let end = tagfile.root().total_len();
    if end != data.len() {
        warn!(
            "chunk walk ended at 0x{:08x}, file size 0x{:08x}",
            end,
            data.len()
        );
        writeln!(
            out,
            "warning: chunk walk ended at 0x{:08x}, file size 0x{:08x}",
            end,
            data.len()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print the ITEM records of an `INDX` section
pub fn dump_item_table<W: Write>(out: &mut W, index: &Chunk<'_>) -> TagfileResult<()> {
    writeln!(out, "\nItems in index:")?;
    for child in index.children() {
        let child = child?;
        if child.tag != ITEM {
            continue;
        }
        writeln!(out, "type     offset   count")?;
        for item in parse_items(child.payload)? {
            writeln!(
                out,
                "[{:06x}] {:08x} {:08x}",
                item.type_index(),
                item.offset,
                item.count
            )?;
        }
    }
    Ok(())
}

fn dump_type_section<W: Write>(out: &mut W, section: &Chunk<'_>) -> TagfileResult<()> {
    let mut children = Vec::new();
    for child in section.children() {
        match child {
            Ok(child) => children.push(child),
            Err(e) => {
                warn!("TYPE section walk failed: {}", e);
                writeln!(out, "\nTYPE: error: {e}")?;
                break;
            }
        }
    }

    let table = |tag| {
        children
            .iter()
            .find(|c| c.tag == tag)
            .map(|c| NameTable::parse(c.payload))
            .unwrap_or_default()
    };
    let type_strings = table(TSTR);
    let field_strings = table(FSTR);
    // TBOD names resolve through TNAM; a broken TNAM leaves every name unknown
    let type_names = children
        .iter()
        .find(|c| c.tag == TNAM)
        .and_then(|c| parse_type_names(c.payload).ok())
        .unwrap_or_default();

    for child in &children {
        let tag = child.tag_str();
        match child.tag {
            TSTR => dump_strings(out, "TSTR", &type_strings)?,
            FSTR => dump_strings(out, "FSTR", &field_strings)?,
            TNAM => match parse_type_names(child.payload) {
                Ok(names) => dump_type_names(out, &names, &type_strings)?,
                Err(e) => report(out, &tag, &e)?,
            },
            TBOD => match parse_type_bodies(child.payload) {
                Ok(bodies) => {
                    let names = Names {
                        types: &type_names,
                        type_strings: &type_strings,
                        field_strings: &field_strings,
                    };
                    dump_type_bodies(out, &bodies, &names)?;
                }
                Err(e) => report(out, &tag, &e)?,
            },
            _ => writeln!(
                out,
                "\n{tag}: {} bytes, not decoded",
                child.payload.len()
            )?,
        }
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, tag: &str, e: &super::TagfileError) -> TagfileResult<()> {
    warn!("cannot decode {}: {}", tag, e);
    writeln!(out, "\n{tag}: error: {e}")?;
    Ok(())
}

fn dump_strings<W: Write>(out: &mut W, tag: &str, table: &NameTable<'_>) -> TagfileResult<()> {
    writeln!(out, "\n{tag}:")?;
    for (id, name) in table.iter().filter(|(_, n)| !n.is_empty()) {
        writeln!(out, "  {id:06x} {name}")?;
    }
    Ok(())
}

fn dump_type_names<W: Write>(
    out: &mut W,
    names: &[TypeName],
    strings: &NameTable<'_>,
) -> TagfileResult<()> {
    writeln!(out, "\nTNAM:")?;
    for entry in names {
        writeln!(
            out,
            "[{:06x}] {:08x} ({})",
            entry.index,
            entry.name,
            strings.name(entry.name)
        )?;
        for param in &entry.params {
            writeln!(out, "    {:08x} -> {:08x}", param.name, param.value)?;
        }
    }
    Ok(())
}

struct Names<'n, 'a> {
    types: &'n [TypeName],
    type_strings: &'n NameTable<'a>,
    field_strings: &'n NameTable<'a>,
}

impl Names<'_, '_> {
    fn type_name(&self, index: u64) -> String {
        if index == 0 {
            return "-".to_string();
        }
        resolve_type_name(self.types, self.type_strings, index).into_owned()
    }
}

fn dump_type_bodies<W: Write>(
    out: &mut W,
    bodies: &[TypeBody],
    names: &Names<'_, '_>,
) -> TagfileResult<()> {
    writeln!(out, "\nTBOD:")?;
    for body in bodies {
        writeln!(
            out,
            "[{:06x}] {} parent=[{:06x}] {} flags={:08x}",
            body.type_index,
            names.type_name(body.type_index),
            body.parent,
            names.type_name(body.parent),
            body.flags
        )?;
        if let Some(v) = body.subtype_flags {
            writeln!(out, "    subtype flags {v:08x}")?;
        }
        if let Some(v) = body.pointer {
            writeln!(out, "    pointer [{:06x}] {}", v, names.type_name(v))?;
        }
        if let Some(v) = body.version {
            writeln!(out, "    version {v}")?;
        }
        if let (Some(size), Some(align)) = (body.byte_size, body.alignment) {
            writeln!(out, "    size {size} align {align}")?;
        }
        if let Some(v) = body.abstract_value {
            writeln!(out, "    abstract {v:08x}")?;
        }
        for m in &body.members {
            writeln!(
                out,
                "    +{:04x} {}: [{:06x}] {} flags={:08x}",
                m.byte_offset,
                names.field_strings.name(m.name),
                m.type_index,
                names.type_name(m.type_index),
                m.flags
            )?;
        }
        for i in &body.interfaces {
            writeln!(
                out,
                "    implements [{:06x}] {} flags={:08x}",
                i.type_index,
                names.type_name(i.type_index),
                i.flags
            )?;
        }
        if let Some(v) = body.attribute {
            writeln!(out, "    attribute {v}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hkx::ItemRole;
    use crate::test_utils::{TagfileBuilder, packed_all};
    use pretty_assertions::assert_eq;

    fn dump(data: &[u8]) -> (String, bool) {
        let mut out = Vec::new();
        let ok = dump_tagfile(&mut out, data, "test.hkx").is_ok();
        (String::from_utf8(out).unwrap(), ok)
    }

    #[test]
    fn test_section_headers_and_items() {
        let data = TagfileBuilder::new()
            .data_at(0, b"ABCD")
            .item(ItemRole::VERTICES, 0x10, 3)
            .build();
        let (text, ok) = dump(&data);
        assert!(ok);

        let expected_start = format!(
            "{BANNER}\n== test.hkx\n{BANNER}\n\n\
             00000008 SDKV len=8 (0x8)\n\
             00000010 | 32 30 31 38 30 31 30 30 {}| 20180100\n\n\
             00000018 DATA len=4 (0x4)\n\
             00000020 | 41 42 43 44 {}| ABCD\n",
            "   ".repeat(8),
            "   ".repeat(12)
        );
        assert_eq!(&text[..expected_start.len()], expected_start);

        assert!(text.contains("\nItems in index:\ntype     offset   count\n[000016] 00000010 00000003\n"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_type_section_decoding() {
        let data = TagfileBuilder::new()
            .type_chunk(b"TSTR", b"hkVector4\0\0hkArray\0")
            .type_chunk(b"TNAM", &packed_all(&[3, 0, 0, 2, 1, 7, 1]))
            .type_chunk(b"FSTR", b"m_data\0")
            .type_chunk(b"TBOD", &packed_all(&[2, 1, 0x28, 16, 8, 1, 0, 0, 4, 1]))
            .type_chunk(b"TPAD", &[0; 4])
            .build();
        let (text, ok) = dump(&data);
        assert!(ok);

        assert!(text.contains("\nTSTR:\n  000000 hkVector4\n  000002 hkArray\n"));
        assert!(text.contains("\nTNAM:\n[000001] 00000000 (hkVector4)\n[000002] 00000002 (hkArray)\n    00000007 -> 00000001\n"));
        assert!(text.contains("\nFSTR:\n  000000 m_data\n"));
        assert!(text.contains("[000002] hkArray parent=[000001] hkVector4 flags=00000028\n"));
        assert!(text.contains("    size 16 align 8\n"));
        assert!(text.contains("    +0004 m_data: [000001] hkVector4 flags=00000000\n"));
        assert!(text.contains("\nTPAD: 4 bytes, not decoded\n"));
    }

    #[test]
    fn test_unknown_names_use_placeholder() {
        let data = TagfileBuilder::new()
            .type_chunk(b"TBOD", &packed_all(&[5, 9, 0x20, 1, 3, 0, 0, 6]))
            .build();
        let (text, ok) = dump(&data);
        assert!(ok);
        assert!(text.contains("[000005] ? parent=[000009] ? flags=00000020\n"));
        assert!(text.contains("    +0000 ?: [000006] ? flags=00000000\n"));
    }

    #[test]
    fn test_broken_subchunk_is_reported() {
        let data = TagfileBuilder::new()
            .type_chunk(b"TNAM", &[0xFF])
            .type_chunk(b"TSTR", b"x\0")
            .build();
        let (text, ok) = dump(&data);
        assert!(ok);
        assert!(text.contains("\nTNAM: error: unsupported packed integer prefix 0xFF"));
        assert!(text.contains("\nTSTR:\n  000000 x\n"));
    }

    #[test]
    fn test_trailing_bytes_warning() {
        let mut data = TagfileBuilder::new().build();
        let size = data.len();
        data.extend_from_slice(&[0; 4]);
        let (text, ok) = dump(&data);
        assert!(ok);
        assert!(text.contains(&format!(
            "warning: chunk walk ended at 0x{:08x}, file size 0x{:08x}",
            size,
            size + 4
        )));
    }

    #[test]
    fn test_truncated_section_is_error() {
        let mut data = TagfileBuilder::new().data_at(0, &[0; 32]).build();
        // Grow the DATA length past the root chunk
        let data_len_at = 8 + 16;
        data[data_len_at + 3] = 0xF0;
        let (text, ok) = dump(&data);
        assert!(!ok);
        assert!(text.contains("\nerror: truncated chunk at 0x18"));
    }
}
