//! Geometry extraction from the object table
//!
//! Items are processed in table order with a small running state:
//!
//! - a transform item replaces the current matrix;
//! - a vertex item appends its vertices, transformed by the current matrix,
//!   and remembers where they start;
//! - an index item appends triangles whose indices are biased by the start
//!   of the most recent vertex item.
//!
//! The state starts from the identity matrix and no vertex start, once per
//! object table.

use tracing::{debug, warn};

use super::error::TagfileResult;
use super::item::{HkxItem, ItemRole};
use super::transform::Transform;
use super::Tagfile;
use crate::error::OutOfBounds;
use crate::mesh::{Geometry, TrianglePolicy};
use crate::view::{f32_at, slice_at, u16_at};
use binrw::Endian;

/// Offset of the matrix within a transform item's data
pub const TRANSFORM_OFFSET: usize = 0x170;

/// Bytes per source vertex (four floats, the fourth unused)
const VERTEX_STRIDE: usize = 16;

/// Bytes per triangle record (four u16, the fourth unused)
const TRIANGLE_STRIDE: usize = 8;

/// Extraction settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// What to do with triangles that reference missing vertices
    pub triangle_policy: TrianglePolicy,
}

#[derive(Debug, Default)]
struct ScanState {
    transform: Transform,
    vertex_start: Option<u32>,
}

/// Extract the geometry of one tagfile
pub fn extract_geometry(data: &[u8]) -> TagfileResult<Geometry> {
    let mut geometry = Geometry::new();
    extract_geometry_into(&mut geometry, data, ExtractOptions::default())?;
    Ok(geometry)
}

/// Extract the geometry of one tagfile and merge it into `target`
///
/// Nothing is merged unless the whole file extracts cleanly, so a failure
/// leaves `target` as it was.
pub fn extract_geometry_into(
    target: &mut Geometry,
    data: &[u8],
    options: ExtractOptions,
) -> TagfileResult<()> {
    let tagfile = Tagfile::parse(data)?;
    let items = tagfile.items()?;
    if !items.iter().any(|item| item.role().is_some()) {
        debug!("no geometry items among {} items", items.len());
        return Ok(());
    }
    let payload = tagfile.payload()?;

    let mut local = Geometry::new();
    let mut state = ScanState::default();
    for item in &items {
        apply_item(&mut local, &mut state, payload, item, options)?;
    }

    debug!(
        "extracted {} vertices, {} triangles",
        local.vertex_count(),
        local.triangle_count()
    );
    target.append(local)?;
    Ok(())
}

fn apply_item(
    geometry: &mut Geometry,
    state: &mut ScanState,
    payload: &[u8],
    item: &HkxItem,
    options: ExtractOptions,
) -> TagfileResult<()> {
    let Some(role) = item.role() else {
        return Ok(());
    };
    let offset = item.offset as usize;
    let count = item.count as usize;

    match role {
        ItemRole::Transform => {
            state.transform = Transform::read_at(payload, offset.saturating_add(TRANSFORM_OFFSET))?;
            debug!("transform at 0x{:X}: {:?}", offset, state.transform.m);
        }
        ItemRole::Vertices => {
            let len = count.checked_mul(VERTEX_STRIDE).ok_or(OutOfBounds {
                offset,
                len: usize::MAX,
                available: payload.len(),
            })?;
            let records = slice_at(payload, offset, len)?;

            let start = u32::try_from(geometry.vertex_count()).unwrap_or(u32::MAX);
            geometry.reserve_vertices(count)?;
            for record in records.chunks_exact(VERTEX_STRIDE) {
                let point = [
                    f32_at(record, 0, Endian::Little)?,
                    f32_at(record, 4, Endian::Little)?,
                    f32_at(record, 8, Endian::Little)?,
                ];
                let [x, y, z] = state.transform.apply(point);
                geometry.add_vertex(x, y, z)?;
            }
            state.vertex_start = Some(start);
            debug!("{} vertices at 0x{:X}, first id {}", count, offset, start);
        }
        ItemRole::Indices => {
            let Some(start) = state.vertex_start else {
                warn!(
                    "index item at 0x{:X} precedes any vertex item, skipping",
                    offset
                );
                return Ok(());
            };
            let triangles = count / 4;
            if triangles == 0 {
                return Ok(());
            }
            // The last record's unused fourth index may lie past the end
            let len = triangles
                .checked_mul(TRIANGLE_STRIDE)
                .map(|n| n - 2)
                .ok_or(OutOfBounds {
                    offset,
                    len: usize::MAX,
                    available: payload.len(),
                })?;
            let records = slice_at(payload, offset, len)?;

            geometry.reserve_triangles(triangles)?;
            for t in 0..triangles {
                let mut tri = [0u32; 3];
                for (k, index) in tri.iter_mut().enumerate() {
                    let raw = u16_at(records, (4 * t + k) * 2, Endian::Little)?;
                    *index = start.saturating_add(u32::from(raw));
                }
                geometry.add_triangle_with(tri, options.triangle_policy)?;
            }
            debug!("{} triangles at 0x{:X}, bias {}", triangles, offset, start);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::hkx::TagfileError;
    use crate::mesh::MeshError;
    use crate::test_utils::{
        TagfileBuilder, f32s, index_records, translation_matrix, vertex_records,
    };

    const SQUARE: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    /// Transform at 0, vertices at 0x200, indices at 0x300
    fn square_file(matrix: Option<[f32; 16]>) -> Vec<u8> {
        let mut builder = TagfileBuilder::new()
            .data_at(0x200, &vertex_records(&SQUARE))
            .data_at(0x300, &index_records(&[[0, 1, 2], [0, 2, 3]]));
        if let Some(m) = matrix {
            builder = builder
                .data_at(TRANSFORM_OFFSET, &f32s(&m))
                .item(ItemRole::TRANSFORM, 0, 1);
        }
        builder
            .item(ItemRole::VERTICES, 0x200, 4)
            .item(ItemRole::INDICES, 0x300, 8)
            .build()
    }

    #[test]
    fn test_identity_transform() {
        let g = extract_geometry(&square_file(Some(translation_matrix(0.0, 0.0, 0.0)))).unwrap();
        assert_eq!(g.vertices(), &SQUARE);
        assert_eq!(g.triangles(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_no_transform_means_identity() {
        let g = extract_geometry(&square_file(None)).unwrap();
        assert_eq!(g.vertices(), &SQUARE);
    }

    #[test]
    fn test_translation() {
        let g = extract_geometry(&square_file(Some(translation_matrix(10.0, -2.0, 0.5)))).unwrap();
        for (out, src) in g.vertices().iter().zip(SQUARE) {
            assert_eq!(*out, [src[0] + 10.0, src[1] - 2.0, src[2] + 0.5]);
        }
    }

    #[test]
    fn test_index_before_vertices_is_skipped() {
        let data = TagfileBuilder::new()
            .data_at(0x40, &index_records(&[[0, 1, 2]]))
            .data_at(0x80, &vertex_records(&SQUARE))
            .item(ItemRole::INDICES, 0x40, 4)
            .item(ItemRole::VERTICES, 0x80, 4)
            .build();
        let g = extract_geometry(&data).unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.triangle_count(), 0);
    }

    #[test]
    fn test_indices_bias_by_latest_vertex_item() {
        let data = TagfileBuilder::new()
            .data_at(0x00, &vertex_records(&SQUARE))
            .data_at(0x40, &vertex_records(&SQUARE[..3]))
            .data_at(0x80, &index_records(&[[0, 1, 2]]))
            .item(ItemRole::VERTICES, 0x00, 4)
            .item(ItemRole::VERTICES, 0x40, 3)
            .item(ItemRole::INDICES, 0x80, 4)
            .build();
        let g = extract_geometry(&data).unwrap();
        assert_eq!(g.triangles(), &[[4, 5, 6]]);
    }

    #[test]
    fn test_out_of_range_triangle_dropped() {
        let data = TagfileBuilder::new()
            .data_at(0x00, &vertex_records(&SQUARE[..3]))
            .data_at(0x40, &index_records(&[[0, 1, 2], [0, 1, 3]]))
            .item(ItemRole::VERTICES, 0x00, 3)
            .item(ItemRole::INDICES, 0x40, 8)
            .build();

        let g = extract_geometry(&data).unwrap();
        assert_eq!(g.triangles(), &[[0, 1, 2]]);
        assert_eq!(g.dropped_triangles(), 1);

        let mut strict = Geometry::new();
        let err = extract_geometry_into(
            &mut strict,
            &data,
            ExtractOptions {
                triangle_policy: TrianglePolicy::Reject,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TagfileError::Mesh(MeshError::VertexOutOfRange { .. })
        ));
        assert!(strict.is_empty());
    }

    #[test]
    fn test_vertex_item_past_payload() {
        let data = TagfileBuilder::new()
            .data_at(0, &vertex_records(&SQUARE))
            .item(ItemRole::VERTICES, 0, 5)
            .build();
        let err = extract_geometry(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_failure_leaves_target_untouched() {
        let mut merged = extract_geometry(&square_file(None)).unwrap();
        let before = merged.clone();

        let bad = TagfileBuilder::new()
            .data_at(0, &vertex_records(&SQUARE))
            .item(ItemRole::VERTICES, 0, 4)
            .item(ItemRole::TRANSFORM, 0x1000, 1)
            .build();
        assert!(extract_geometry_into(&mut merged, &bad, ExtractOptions::default()).is_err());
        assert_eq!(merged, before);
    }

    #[test]
    fn test_merging_two_objects() {
        let mut merged = Geometry::new();
        let file = square_file(None);
        extract_geometry_into(&mut merged, &file, ExtractOptions::default()).unwrap();
        extract_geometry_into(&mut merged, &file, ExtractOptions::default()).unwrap();
        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.triangles()[3], [4, 6, 7]);
    }

    #[test]
    fn test_unrelated_items_ignored() {
        let data = TagfileBuilder::new()
            .item(0x0000_004B, 0, 1)
            .item(0x3000_0016, 0, 99)
            .build();
        let g = extract_geometry(&data).unwrap();
        assert!(g.is_empty());
    }
}
