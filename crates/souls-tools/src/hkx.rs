//! hkxtool: list, dump and extract geometry from tagfiles
//!
//! The input is either a single tagfile (plain or DCX-compressed) or a split
//! archive whose entries are DCX-compressed tagfiles. In extract mode the
//! geometry of every object is merged into one mesh.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use souls_formats::bhd::{BhdArchive, INDEX_MAGIC};
use souls_formats::dcx;
use souls_formats::hkx::{
    ExtractOptions, TagfileError, TagfileResult, dump_tagfile, extract_geometry_into, is_tagfile,
};
use souls_formats::mesh::Geometry;
use tracing::{debug, warn};

use crate::cli::Mode;

/// Input file, classified by its magic
#[derive(Debug)]
pub enum Input {
    /// Split archive of DCX-compressed tagfiles
    Archive(BhdArchive),
    /// One tagfile, already inflated if it was compressed
    Single {
        /// Name to report the object under
        name: String,
        /// Tagfile bytes
        data: Vec<u8>,
    },
}

impl Input {
    /// Open `path`, detecting a split archive, a tagfile or a DCX container
    pub fn open(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("Can't open '{}'", path.display()))?;
        let name = path.display().to_string();

        if data.starts_with(&INDEX_MAGIC) {
            debug!("{} is a split archive", name);
            let archive = BhdArchive::open_with_index(path, data)
                .with_context(|| format!("Can't open '{name}'"))?;
            return Ok(Self::Archive(archive));
        }
        if is_tagfile(&data) {
            return Ok(Self::Single { name, data });
        }
        if dcx::is_dcx(&data) {
            debug!("{} is DCX-compressed", name);
            let data =
                dcx::decompress_bytes(&data).with_context(|| format!("Can't inflate '{name}'"))?;
            return Ok(Self::Single { name, data });
        }
        bail!("Unknown format in '{name}'")
    }
}

/// Outcome of a run
#[derive(Debug, Default)]
pub struct HkxSummary {
    /// Merged geometry (empty unless extracting)
    pub geometry: Geometry,
    /// Names of objects that failed
    pub failed: Vec<String>,
}

/// Run `mode` over every object of `input`
///
/// Only errors writing to `out` abort the run; object failures are printed
/// and recorded in the summary.
pub fn run<W: Write>(out: &mut W, input: &Input, mode: Mode) -> io::Result<HkxSummary> {
    let mut summary = HkxSummary::default();
    match input {
        Input::Single { name, data } => {
            if let Err(e) = process_object(out, data, name, mode, &mut summary.geometry)? {
                report_failure(out, name, &e)?;
                summary.failed.push(name.clone());
            }
        }
        Input::Archive(archive) => {
            for (index, entry) in archive.entries().enumerate() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("entry {}: {}", index, e);
                        writeln!(out, "ERROR reading entry {index}: {e}")?;
                        summary.failed.push(format!("{index}.dat"));
                        continue;
                    }
                };
                let name = entry.display_name();
                let data = match dcx::decompress_bytes(entry.data) {
                    Ok(data) => data,
                    Err(e) => {
                        warn!("inflating {}: {}", name, e);
                        writeln!(out, "Can't inflate '{name}'")?;
                        summary.failed.push(name.into_owned());
                        continue;
                    }
                };
                if let Err(e) = process_object(out, &data, &name, mode, &mut summary.geometry)? {
                    report_failure(out, &name, &e)?;
                    summary.failed.push(name.into_owned());
                }
            }
        }
    }
    Ok(summary)
}

/// Process one inflated tagfile
///
/// The outer result carries output errors, the inner one the object's own
/// failure.
fn process_object<W: Write>(
    out: &mut W,
    data: &[u8],
    name: &str,
    mode: Mode,
    geometry: &mut Geometry,
) -> io::Result<TagfileResult<()>> {
    let result = match mode {
        Mode::List => {
            writeln!(out, "{:8} {}", data.len(), name)?;
            Ok(())
        }
        Mode::Dump => dump_tagfile(out, data, name),
        Mode::Extract => extract_geometry_into(geometry, data, ExtractOptions::default()),
    };
    Ok(result)
}

fn report_failure<W: Write>(
    out: &mut W,
    name: &str,
    e: &TagfileError,
) -> io::Result<()> {
    warn!("{}: {}", name, e);
    writeln!(out, "ERROR in '{name}': {e}")
}

/// Default mesh path: the input's file name plus `.obj`, in the working directory
pub fn default_obj_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".obj");
    PathBuf::from(name)
}

/// Write the merged mesh
pub fn write_mesh(geometry: &Geometry, path: &Path) -> Result<()> {
    if geometry.dropped_triangles() > 0 {
        warn!(
            "{} triangles referenced missing vertices and were dropped",
            geometry.dropped_triangles()
        );
    }
    geometry
        .export_obj(path)
        .with_context(|| format!("Can't write '{}'", path.display()))
}
