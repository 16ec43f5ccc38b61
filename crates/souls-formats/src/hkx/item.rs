//! Object table items

use binrw::BinRead;
use binrw::io::Cursor;

use super::error::TagfileResult;

/// Size of one ITEM record
pub const ITEM_SIZE: usize = 12;

/// Mask selecting the type index from the raw type word
pub const TYPE_INDEX_MASK: u32 = 0x00FF_FFFF;

/// One object table record (12 bytes, little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct HkxItem {
    /// Type index in the low 24 bits, item flags in the high byte
    pub raw_type: u32,
    /// Offset of the item's data in the DATA payload
    pub offset: u32,
    /// Number of elements
    pub count: u32,
}

impl HkxItem {
    /// Type index with the flag byte masked off
    pub fn type_index(&self) -> u32 {
        self.raw_type & TYPE_INDEX_MASK
    }

    /// High byte of the raw type word
    pub fn flags(&self) -> u8 {
        (self.raw_type >> 24) as u8
    }

    /// Geometry role of this item, if any
    pub fn role(&self) -> Option<ItemRole> {
        ItemRole::from_raw(self.raw_type)
    }
}

/// Items that carry geometry
///
/// Matching uses the whole raw word: the same type index with different flags
/// is a different kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    /// A rigid body; its 4x4 matrix sits 0x170 bytes into the item
    Transform,
    /// `count` vertices of four floats each
    Vertices,
    /// `count / 4` triangles of four u16 each (the fourth unused)
    Indices,
}

impl ItemRole {
    /// Raw type word of transform items
    pub const TRANSFORM: u32 = 0x1000_004B;
    /// Raw type word of vertex array items
    pub const VERTICES: u32 = 0x2000_0016;
    /// Raw type word of index array items
    pub const INDICES: u32 = 0x2000_000D;

    /// Classify a raw type word
    pub fn from_raw(raw_type: u32) -> Option<Self> {
        match raw_type {
            Self::TRANSFORM => Some(Self::Transform),
            Self::VERTICES => Some(Self::Vertices),
            Self::INDICES => Some(Self::Indices),
            _ => None,
        }
    }

    /// Raw type word for this role
    pub fn raw_type(self) -> u32 {
        match self {
            Self::Transform => Self::TRANSFORM,
            Self::Vertices => Self::VERTICES,
            Self::Indices => Self::INDICES,
        }
    }
}

/// Decode the records of an ITEM chunk payload
///
/// A trailing partial record is ignored.
pub fn parse_items(payload: &[u8]) -> TagfileResult<Vec<HkxItem>> {
    payload
        .chunks_exact(ITEM_SIZE)
        .map(|record| Ok(HkxItem::read(&mut Cursor::new(record))?))
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let mut payload = Vec::new();
        for v in [0x2000_0016u32, 0x10, 3, 0x0000_0016, 0x20, 1] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        payload.extend_from_slice(&[0xFF; 5]);

        let items = parse_items(&payload).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].role(), Some(ItemRole::Vertices));
        assert_eq!(items[0].type_index(), 0x16);
        assert_eq!(items[0].flags(), 0x20);
        assert_eq!((items[0].offset, items[0].count), (0x10, 3));

        // Same type index without the flag byte is not a vertex array
        assert_eq!(items[1].type_index(), 0x16);
        assert_eq!(items[1].role(), None);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [ItemRole::Transform, ItemRole::Vertices, ItemRole::Indices] {
            assert_eq!(ItemRole::from_raw(role.raw_type()), Some(role));
        }
    }
}
