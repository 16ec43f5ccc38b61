//! Merged triangle geometry
//!
//! [`Geometry`] collects vertices and triangles from any number of extracted
//! objects under one global vertex numbering. Buffers grow geometrically
//! through `try_reserve`, so a failed allocation surfaces as
//! [`MeshError::OutOfMemory`] instead of aborting.

mod error;
mod obj;

pub use error::{MeshError, MeshResult};

use tracing::warn;

/// What to do with a triangle that references a missing vertex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrianglePolicy {
    /// Skip the triangle and keep going
    #[default]
    Drop,
    /// Fail with [`MeshError::VertexOutOfRange`]
    Reject,
}

/// Growable vertex and triangle buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    dropped: usize,
}

impl Geometry {
    /// Create an empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of triangles dropped by [`TrianglePolicy::Drop`]
    pub fn dropped_triangles(&self) -> usize {
        self.dropped
    }

    /// Stored vertex positions
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Stored triangles as 0-based vertex indices
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// True if no vertices and no triangles are stored
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Make room for `additional` more vertices
    pub fn reserve_vertices(&mut self, additional: usize) -> MeshResult<()> {
        let total = self.vertices.len().saturating_add(additional);
        if u32::try_from(total).is_err() {
            return Err(MeshError::TooManyVertices(total));
        }
        self.vertices
            .try_reserve(additional)
            .map_err(|_| MeshError::OutOfMemory {
                requested: additional,
            })
    }

    /// Make room for `additional` more triangles
    pub fn reserve_triangles(&mut self, additional: usize) -> MeshResult<()> {
        self.triangles
            .try_reserve(additional)
            .map_err(|_| MeshError::OutOfMemory {
                requested: additional,
            })
    }

    /// Append a vertex and return its 0-based id
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> MeshResult<u32> {
        let id = u32::try_from(self.vertices.len())
            .map_err(|_| MeshError::TooManyVertices(self.vertices.len()))?;
        self.reserve_vertices(1)?;
        self.vertices.push([x, y, z]);
        Ok(id)
    }

    /// Append a triangle, dropping it if any index is out of range
    ///
    /// Returns whether the triangle was stored.
    pub fn add_triangle(&mut self, i: u32, j: u32, k: u32) -> MeshResult<bool> {
        self.add_triangle_with([i, j, k], TrianglePolicy::Drop)
    }

    /// Append a triangle, failing if any index is out of range
    pub fn try_add_triangle(&mut self, i: u32, j: u32, k: u32) -> MeshResult<()> {
        self.add_triangle_with([i, j, k], TrianglePolicy::Reject)
            .map(|_| ())
    }

    /// Append a triangle with an explicit out-of-range policy
    pub fn add_triangle_with(
        &mut self,
        triangle: [u32; 3],
        policy: TrianglePolicy,
    ) -> MeshResult<bool> {
        let count = self.vertices.len();
        if triangle.iter().any(|&v| v as usize >= count) {
            let vertex_count = u32::try_from(count).unwrap_or(u32::MAX);
            return match policy {
                TrianglePolicy::Drop => {
                    warn!(
                        "dropping triangle {:?}: only {} vertices",
                        triangle, vertex_count
                    );
                    self.dropped += 1;
                    Ok(false)
                }
                TrianglePolicy::Reject => Err(MeshError::VertexOutOfRange {
                    triangle,
                    vertex_count,
                }),
            };
        }
        self.reserve_triangles(1)?;
        self.triangles.push(triangle);
        Ok(true)
    }

    /// Move all of `other` into this geometry, renumbering its vertices
    pub fn append(&mut self, other: Self) -> MeshResult<()> {
        let base = self.vertices.len();
        self.reserve_vertices(other.vertices.len())?;
        self.reserve_triangles(other.triangles.len())?;
        // reserve_vertices checked that every new id fits in u32
        let base = base as u32;

        self.vertices.extend(other.vertices);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|tri| tri.map(|v| v + base)),
        );
        self.dropped += other.dropped;
        Ok(())
    }
}
