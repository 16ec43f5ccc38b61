//! Wavefront OBJ export
//!
//! Output layout:
//!
//! ```text
//! # 3 vertices
//! v 0.000000 0.000000 0.000000
//! v 1.000000 0.000000 0.000000
//! v 0.000000 1.000000 0.000000
//!
//! # 1 triangles
//! f 1 2 3
//! ```
//!
//! Coordinates are written exactly as stored; no axis is flipped. Face
//! indices are 1-based.

use super::{Geometry, MeshError, MeshResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

impl Geometry {
    /// Write the geometry as OBJ text
    pub fn write_obj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "# {} vertices", self.vertices.len())?;
        for [x, y, z] in &self.vertices {
            writeln!(out, "v {:.6} {:.6} {:.6}", x, y, z)?;
        }
        writeln!(out)?;

        writeln!(out, "# {} triangles", self.triangles.len())?;
        for [a, b, c] in &self.triangles {
            writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
        }
        Ok(())
    }

    /// Write the geometry to an OBJ file, replacing any existing file
    pub fn export_obj(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        let path = path.as_ref();
        let write_err = |source| MeshError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        self.write_obj(&mut out).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        info!(
            "wrote {} vertices, {} triangles to {}",
            self.vertices.len(),
            self.triangles.len(),
            path.display()
        );
        Ok(())
    }
}
