//! Archive entry view shared by the BND3 and BHF3 readers

use std::borrow::Cow;

/// One file stored in an archive
///
/// The entry borrows its bytes from the archive's buffer, so it cannot outlive
/// the archive it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    /// Position of the entry in the archive's record table
    pub index: u32,
    /// Stored file name, absent for sequentially numbered layouts
    pub name: Option<Cow<'a, str>>,
    /// Entry bytes, exactly as stored (possibly DCX-compressed)
    pub data: &'a [u8],
}

impl ArchiveEntry<'_> {
    /// Stored size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Name to show or extract under
    ///
    /// Falls back to `<index>.dat` when the layout stores no names.
    pub fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_ref()),
            None => Cow::Owned(format!("{}.dat", self.index)),
        }
    }
}

/// Decode a stored name; names are not guaranteed to be UTF-8
pub(crate) fn decode_name(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}
