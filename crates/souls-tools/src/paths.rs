//! Mapping stored entry names to extraction paths
//!
//! Stored names are Windows paths such as `N:\FRPG\data\Model\c0000.flver`.
//! The drive prefix and leading separators are removed and the rest becomes a
//! relative path under the output directory.

use std::path::PathBuf;
use thiserror::Error;

/// Entry name that cannot be extracted safely
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Name would escape the output directory
    #[error("Refusing to extract file containing '..' in name ('{0}')")]
    ParentReference(String),

    /// Nothing left after stripping the prefix
    #[error("empty file name")]
    Empty,
}

/// Relative path an entry is extracted to
///
/// A trailing `.dcx` is dropped when the entry was inflated.
pub fn sanitize_entry_path(name: &str, inflated: bool) -> Result<PathBuf, PathError> {
    let name = name.split_once(':').map_or(name, |(_, rest)| rest);
    let name = name.trim_start_matches('\\');
    if name.contains("..") {
        return Err(PathError::ParentReference(name.to_string()));
    }

    let name = if inflated {
        name.strip_suffix(".dcx").unwrap_or(name)
    } else {
        name
    };
    let relative = name.replace('\\', "/");
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(PathBuf::from(relative))
}
