//! Read-only parsers for FromSoftware container, archive and tagfile formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format tags don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::float_cmp)] // Exact float checks in transform tests
//! This crate decodes the binary formats shipped with the game data: the
//! DCX compressed container, the BND3 combined archive, the BHF3/BDF3 split
//! archive and the HKX reflection tagfile, from which collision geometry can
//! be rebuilt and exported as a Wavefront OBJ mesh.
//!
//! # Supported Formats
//!
//! - **DCX**: 64-byte header wrapping a single zlib stream with an exact
//!   declared decompressed size
//! - **BND3**: single-file archive whose header flags select one of five
//!   record layouts
//! - **BHF3/BDF3**: split archive with the index and the entry bytes in two
//!   separate files
//! - **HKX (TAG0)**: length-prefixed chunk tree holding a typed object graph
//!
//! # Design Principles
//!
//! - **Read-Only**: no encoders; every parser borrows from a buffer the caller
//!   owns
//! - **Untrusted Input**: every offset read from a file is bounds-checked
//!   against its owning buffer and fails with [`OutOfBounds`] instead of
//!   reading adjacent memory
//! - **Per-Entry Failure**: archive entries are decoded independently so a
//!   batch over an archive can report a bad entry and continue

#![warn(missing_docs)]

/// BHF3/BDF3 split archives (separate index and data files)
pub mod bhd;
/// BND3 combined archives with flags-selected record layouts
pub mod bnd;
/// DCX compressed container
///
/// This module validates the fixed 64-byte container header and inflates the
/// wrapped zlib stream into a buffer of exactly the declared size. Inputs come
/// from any [`source::ByteSource`], so the same decoder serves files on disk
/// and archive entries already in memory.
pub mod dcx;
mod entry;
mod error;
pub mod hexdump;
/// HKX reflection tagfiles
///
/// Walks the chunk tree of a TAG0 file, locates the object table and the raw
/// payload section, and rebuilds transformed collision geometry from the
/// recognized items. The type metadata section can be decoded for diagnostic
/// dumps.
pub mod hkx;
/// Merged triangle geometry and Wavefront OBJ export
pub mod mesh;
pub mod source;
pub mod view;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use entry::ArchiveEntry;
pub use error::{ErrorKind, OutOfBounds};
