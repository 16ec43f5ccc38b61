//! TYPE section decoding
//!
//! The TYPE section describes the reflected type graph. It is not needed to
//! extract geometry; it is decoded for diagnostic dumps only. Sub-chunks:
//!
//! - `TSTR`: NUL-separated type name strings
//! - `FSTR`: NUL-separated field name strings
//! - `TNAM`: per type, a name string id and template parameters
//! - `TBOD`: per type, parent, flags and the optional fields the flags enable
//!
//! All numbers in `TNAM` and `TBOD` are packed integers (see
//! [`read_packed`]).

use std::borrow::Cow;

use super::chunk::Chunk;
use super::error::TagfileResult;
use super::packed::read_packed;
use super::{FSTR, TBOD, TNAM, TSTR};

/// Placeholder for a name that cannot be resolved
pub const UNKNOWN_NAME: &str = "?";

/// String table where every NUL-terminated string, empty or not, takes an id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable<'a> {
    names: Vec<&'a [u8]>,
}

impl<'a> NameTable<'a> {
    /// Split a TSTR or FSTR payload
    pub fn parse(payload: &'a [u8]) -> Self {
        if payload.is_empty() {
            return Self::default();
        }
        let body = payload.strip_suffix(&[0]).unwrap_or(payload);
        Self {
            names: body.split(|&b| b == 0).collect(),
        }
    }

    /// Number of ids
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the table holds no strings
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name with the given id, if present
    pub fn get(&self, id: u64) -> Option<Cow<'a, str>> {
        let id = usize::try_from(id).ok()?;
        self.names.get(id).map(|&n| String::from_utf8_lossy(n))
    }

    /// Name with the given id, or [`UNKNOWN_NAME`]
    pub fn name(&self, id: u64) -> Cow<'a, str> {
        self.get(id).unwrap_or(Cow::Borrowed(UNKNOWN_NAME))
    }

    /// All `(id, name)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Cow<'a, str>)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(id, &n)| (id, String::from_utf8_lossy(n)))
    }
}

/// Template parameter of a named type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateParam {
    /// Parameter name string id
    pub name: u64,
    /// Parameter value (a type index or a plain value)
    pub value: u64,
}

/// One TNAM entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// Type index (1-based)
    pub index: u64,
    /// Type name string id
    pub name: u64,
    /// Template parameters
    pub params: Vec<TemplateParam>,
}

/// One member of a type body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Field name string id
    pub name: u64,
    /// Member flags
    pub flags: u64,
    /// Offset within the owning object
    pub byte_offset: u64,
    /// Member type index
    pub type_index: u64,
}

/// One interface implemented by a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    /// Interface type index
    pub type_index: u64,
    /// Interface flags
    pub flags: u64,
}

/// Flag bits of a TBOD entry; each enables the fields that follow it
pub mod body_flags {
    /// Subtype flags follow
    pub const SUBTYPE: u64 = 0x01;
    /// Pointer type index follows
    pub const POINTER: u64 = 0x02;
    /// Version follows
    pub const VERSION: u64 = 0x04;
    /// Byte size and alignment follow
    pub const BYTE_SIZE: u64 = 0x08;
    /// Abstract value follows
    pub const ABSTRACT: u64 = 0x10;
    /// Member list follows
    pub const MEMBERS: u64 = 0x20;
    /// Interface list follows
    pub const INTERFACES: u64 = 0x40;
    /// Attribute follows
    pub const ATTRIBUTE: u64 = 0x80;
}

/// One TBOD entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBody {
    /// Type index this body describes
    pub type_index: u64,
    /// Parent type index (0 for none)
    pub parent: u64,
    /// Which optional fields are present
    pub flags: u64,
    /// Subtype flags
    pub subtype_flags: Option<u64>,
    /// Pointed-to type index
    pub pointer: Option<u64>,
    /// Type version
    pub version: Option<u64>,
    /// Object size in bytes
    pub byte_size: Option<u64>,
    /// Required alignment
    pub alignment: Option<u64>,
    /// Abstract value
    pub abstract_value: Option<u64>,
    /// Declared members
    pub members: Vec<Member>,
    /// Implemented interfaces
    pub interfaces: Vec<Interface>,
    /// Attribute string id
    pub attribute: Option<u64>,
}

/// Decode a TNAM payload
///
/// The payload starts with a count; entries are numbered from 1 and there
/// are `count - 1` of them.
pub fn parse_type_names(payload: &[u8]) -> TagfileResult<Vec<TypeName>> {
    let mut offset = 0;
    let count = read_packed(payload, &mut offset)?;
    let mut names = Vec::new();
    for index in 1..count {
        let name = read_packed(payload, &mut offset)?;
        let num_params = read_packed(payload, &mut offset)?;
        let mut params = Vec::new();
        for _ in 0..num_params {
            let name = read_packed(payload, &mut offset)?;
            let value = read_packed(payload, &mut offset)?;
            params.push(TemplateParam { name, value });
        }
        names.push(TypeName {
            index,
            name,
            params,
        });
    }
    Ok(names)
}

/// Decode a TBOD payload
///
/// A zero type index is padding and is skipped.
pub fn parse_type_bodies(payload: &[u8]) -> TagfileResult<Vec<TypeBody>> {
    use body_flags::{
        ABSTRACT, ATTRIBUTE, BYTE_SIZE, INTERFACES, MEMBERS, POINTER, SUBTYPE, VERSION,
    };

    let mut offset = 0;
    let mut bodies = Vec::new();
    let next = |offset: &mut usize| read_packed(payload, offset);

    while offset < payload.len() {
        let type_index = next(&mut offset)?;
        if type_index == 0 {
            continue;
        }
        let mut body = TypeBody {
            type_index,
            parent: next(&mut offset)?,
            flags: next(&mut offset)?,
            ..TypeBody::default()
        };
        let flags = body.flags;

        if flags & SUBTYPE != 0 {
            body.subtype_flags = Some(next(&mut offset)?);
        }
        if flags & POINTER != 0 {
            body.pointer = Some(next(&mut offset)?);
        }
        if flags & VERSION != 0 {
            body.version = Some(next(&mut offset)?);
        }
        if flags & BYTE_SIZE != 0 {
            body.byte_size = Some(next(&mut offset)?);
            body.alignment = Some(next(&mut offset)?);
        }
        if flags & ABSTRACT != 0 {
            body.abstract_value = Some(next(&mut offset)?);
        }
        if flags & MEMBERS != 0 {
            let count = next(&mut offset)?;
            for _ in 0..count {
                body.members.push(Member {
                    name: next(&mut offset)?,
                    flags: next(&mut offset)?,
                    byte_offset: next(&mut offset)?,
                    type_index: next(&mut offset)?,
                });
            }
        }
        if flags & INTERFACES != 0 {
            let count = next(&mut offset)?;
            for _ in 0..count {
                body.interfaces.push(Interface {
                    type_index: next(&mut offset)?,
                    flags: next(&mut offset)?,
                });
            }
        }
        if flags & ATTRIBUTE != 0 {
            body.attribute = Some(next(&mut offset)?);
        }
        bodies.push(body);
    }
    Ok(bodies)
}

/// Resolve a type index through TNAM and TSTR
pub fn resolve_type_name<'a>(
    names: &[TypeName],
    strings: &NameTable<'a>,
    type_index: u64,
) -> Cow<'a, str> {
    names
        .iter()
        .find(|n| n.index == type_index)
        .and_then(|n| strings.get(n.name))
        .unwrap_or(Cow::Borrowed(UNKNOWN_NAME))
}

/// Decoded TYPE section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMetadata<'a> {
    /// TSTR strings
    pub type_strings: NameTable<'a>,
    /// FSTR strings
    pub field_strings: NameTable<'a>,
    /// TNAM entries
    pub type_names: Vec<TypeName>,
    /// TBOD entries
    pub bodies: Vec<TypeBody>,
    /// Tags of sub-chunks that were not decoded (TPTR, TPAD, THSH, ...)
    pub skipped: Vec<[u8; 4]>,
}

impl<'a> TypeMetadata<'a> {
    /// Decode every known sub-chunk of a TYPE section
    pub fn parse(section: &Chunk<'a>) -> TagfileResult<Self> {
        let mut meta = Self::default();
        for child in section.children() {
            let child = child?;
            match child.tag {
                TSTR => meta.type_strings = NameTable::parse(child.payload),
                FSTR => meta.field_strings = NameTable::parse(child.payload),
                TNAM => meta.type_names = parse_type_names(child.payload)?,
                TBOD => meta.bodies = parse_type_bodies(child.payload)?,
                other => meta.skipped.push(other),
            }
        }
        Ok(meta)
    }

    /// Name of a type index, or [`UNKNOWN_NAME`]
    pub fn type_name(&self, type_index: u64) -> Cow<'a, str> {
        resolve_type_name(&self.type_names, &self.type_strings, type_index)
    }

    /// Name of a field string id, or [`UNKNOWN_NAME`]
    pub fn field_name(&self, id: u64) -> Cow<'a, str> {
        self.field_strings.name(id)
    }
}
