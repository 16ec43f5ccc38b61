//! Geometry error types

use crate::error::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Geometry accumulation and export errors
#[derive(Debug, Error)]
pub enum MeshError {
    /// Triangle references a vertex that does not exist yet
    #[error("triangle {triangle:?} references a vertex beyond the {vertex_count} stored")]
    VertexOutOfRange {
        /// Offending vertex indices
        triangle: [u32; 3],
        /// Vertex count at the time of the insert
        vertex_count: u32,
    },

    /// Vertex numbering would no longer fit in 32 bits
    #[error("too many vertices: {0}")]
    TooManyVertices(usize),

    /// Could not grow a buffer
    #[error("out of memory growing geometry by {requested} elements")]
    OutOfMemory {
        /// Number of elements requested
        requested: usize,
    },

    /// Could not write the exported mesh
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl MeshError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VertexOutOfRange { .. } => ErrorKind::OutOfBounds,
            Self::TooManyVertices(_) | Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Self::Write { .. } => ErrorKind::Io,
        }
    }
}

/// Result type for geometry operations
pub type MeshResult<T> = Result<T, MeshError>;
