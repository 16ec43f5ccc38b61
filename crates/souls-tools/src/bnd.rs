//! bndtool: list, dump and extract BND3 archives
//!
//! Each entry is processed on its own. A failure to read, inflate or write an
//! entry is printed in the output and the run continues with the next one.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use souls_formats::bnd::BndArchive;
use souls_formats::dcx;
use souls_formats::hexdump::write_hexdump;
use tracing::{debug, warn};

use crate::cli::{Commands, Mode};
use crate::paths::sanitize_entry_path;

/// Outcome of a run over one archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BndSummary {
    /// Entries processed without error
    pub processed: usize,
    /// Entries that failed
    pub failed: usize,
}

/// Run `commands` over every entry of `archive`
///
/// Extracted files are written below `output_dir`. Only errors writing to
/// `out` itself abort the run.
pub fn run<W: Write>(
    out: &mut W,
    archive: &BndArchive,
    commands: Commands,
    output_dir: &Path,
) -> io::Result<BndSummary> {
    let mut summary = BndSummary::default();
    for (index, entry) in archive.entries().enumerate() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("entry {}: {}", index, e);
                writeln!(out, "ERROR reading entry {index}: {e}")?;
                summary.failed += 1;
                continue;
            }
        };
        let name = entry.display_name();

        let (data, inflated) = if commands.inflate && dcx::is_dcx(entry.data) {
            match dcx::decompress_bytes(entry.data) {
                Ok(bytes) => (Cow::Owned(bytes), true),
                Err(e) => {
                    warn!("inflating {}: {}", name, e);
                    writeln!(out, "ERROR inflating '{name}'")?;
                    summary.failed += 1;
                    continue;
                }
            }
        } else {
            (Cow::Borrowed(entry.data), false)
        };

        let ok = match commands.mode {
            Mode::List => {
                if inflated {
                    writeln!(out, "{:8} / {:<8} {}", entry.size(), data.len(), name)?;
                } else {
                    writeln!(out, "{:8} {}", data.len(), name)?;
                }
                true
            }
            Mode::Dump => {
                writeln!(out, "-> {name}:")?;
                write_hexdump(out, &data, 0)?;
                true
            }
            Mode::Extract => extract_entry(out, &name, &data, inflated, output_dir)?,
        };

        if ok {
            summary.processed += 1;
        } else {
            summary.failed += 1;
        }
    }
    debug!(
        "{} entries processed, {} failed",
        summary.processed, summary.failed
    );
    Ok(summary)
}

fn extract_entry<W: Write>(
    out: &mut W,
    name: &str,
    data: &[u8],
    inflated: bool,
    output_dir: &Path,
) -> io::Result<bool> {
    let relative = match sanitize_entry_path(name, inflated) {
        Ok(path) => path,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(false);
        }
    };
    writeln!(out, "-> extracting '{}'", relative.display())?;

    let path = output_dir.join(&relative);
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!("creating {}: {}", parent.display(), e);
        writeln!(out, "Can't create directory '{}'", parent.display())?;
        return Ok(false);
    }
    if let Err(e) = std::fs::write(&path, data) {
        warn!("writing {}: {}", path.display(), e);
        writeln!(out, "ERROR writing '{}'", relative.display())?;
        return Ok(false);
    }
    Ok(true)
}
