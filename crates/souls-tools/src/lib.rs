//! Command-line front ends for the souls-formats parsers
//!
//! The binaries stay thin: argument parsing and log setup live in the
//! binaries, while the per-entry work for each tool lives here so it can be
//! tested against in-memory output.
//!
//! - `bndtool`: list, dump and extract BND3 archives
//! - `hkxtool`: list, dump and extract geometry from tagfiles and split
//!   archives of tagfiles
//! - `dcxtool`: inflate one DCX container to disk

#![allow(clippy::uninlined_format_args)]

pub mod bnd;
pub mod cli;
pub mod hkx;
pub mod logging;
pub mod paths;
