//! Geometry merging: cells into one buffer, datasets into one morph set.

use thiserror::Error;
use tracing::debug;

use crate::synth::CellFragment;

/// Errors raised while merging dataset geometries.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A dataset's vertex count differs from the canonical geometry. The
    /// cross-dataset visibility pass is supposed to make this impossible;
    /// failing fast here beats silently misblending morph targets.
    #[error("dataset {dataset} has {vertices} vertices, expected {expected}")]
    ShapeMismatch {
        dataset: usize,
        vertices: usize,
        expected: usize,
    },

    /// A dataset's triangulation differs from the canonical geometry.
    #[error("dataset {dataset} has {indices} indices, expected {expected}")]
    IndexMismatch {
        dataset: usize,
        indices: usize,
        expected: usize,
    },

    /// Nothing to merge.
    #[error("no dataset geometries to merge")]
    Empty,
}

/// One dataset's merged, mesh-ready geometry: interleaved f32 positions,
/// normalized u8 RGB colors, and u32 triangle indices.
#[derive(Debug, Clone, Default)]
pub struct MergedGeometry {
    pub positions: Vec<f32>,
    pub colors: Vec<u8>,
    pub indices: Vec<u32>,
}

impl MergedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Concatenate per-cell fragments into one static geometry buffer.
///
/// Fragments are already in sphere space, so merging is pure concatenation
/// with base-vertex index offsets. Nothing changes after combination, so no
/// dynamic re-merge path exists.
pub fn merge_cells(fragments: &[CellFragment]) -> MergedGeometry {
    let vertex_total: usize = fragments.iter().map(|f| f.positions.len()).sum();
    let index_total: usize = fragments.iter().map(|f| f.indices.len()).sum();

    let mut merged = MergedGeometry {
        positions: Vec::with_capacity(vertex_total * 3),
        colors: Vec::with_capacity(vertex_total * 3),
        indices: Vec::with_capacity(index_total),
    };

    for fragment in fragments {
        let base = merged.vertex_count() as u32;
        for position in &fragment.positions {
            merged.positions.extend_from_slice(position);
            merged.colors.extend_from_slice(&fragment.color.to_array());
        }
        merged
            .indices
            .extend(fragment.indices.iter().map(|i| i + base));
    }

    debug!(
        vertices = merged.vertex_count(),
        triangles = merged.indices.len() / 3,
        "merged cell fragments"
    );
    merged
}

/// The combined geometry: dataset 0's topology plus every dataset's
/// positions as a morph target (target 0 included).
#[derive(Debug, Clone)]
pub struct BaseGeometry {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
    pub morph_positions: Vec<Vec<f32>>,
}

impl BaseGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of position morph targets.
    pub fn target_count(&self) -> usize {
        self.morph_positions.len()
    }
}

/// Per-dataset color attributes extracted at merge time, keyed by dataset
/// index. Read-only once built; the multiplexer picks which entries occupy
/// the host's limited color slots.
#[derive(Debug, Clone)]
pub struct AttributeBank {
    colors: Vec<Vec<u8>>,
}

impl AttributeBank {
    /// The color attribute for one dataset.
    pub fn color_attribute(&self, dataset: usize) -> Option<&[u8]> {
        self.colors.get(dataset).map(Vec::as_slice)
    }

    /// Number of datasets in the bank.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Merge all dataset geometries into one base geometry plus the color bank.
///
/// Geometry 0's layout is canonical. Every input must already carry the
/// identical vertex count and triangulation, a direct consequence of the
/// cross-dataset visibility pass; anything else is a [`GeometryError`].
pub fn merge_datasets(
    geometries: Vec<MergedGeometry>,
) -> Result<(BaseGeometry, AttributeBank), GeometryError> {
    let Some(first) = geometries.first() else {
        return Err(GeometryError::Empty);
    };
    let expected_vertices = first.vertex_count();
    let expected_indices = first.indices.len();

    for (dataset, geometry) in geometries.iter().enumerate() {
        if geometry.vertex_count() != expected_vertices {
            return Err(GeometryError::ShapeMismatch {
                dataset,
                vertices: geometry.vertex_count(),
                expected: expected_vertices,
            });
        }
        if geometry.indices.len() != expected_indices {
            return Err(GeometryError::IndexMismatch {
                dataset,
                indices: geometry.indices.len(),
                expected: expected_indices,
            });
        }
    }

    let base = BaseGeometry {
        positions: first.positions.clone(),
        indices: first.indices.clone(),
        morph_positions: geometries.iter().map(|g| g.positions.clone()).collect(),
    };
    let bank = AttributeBank {
        colors: geometries.into_iter().map(|g| g.colors).collect(),
    };

    debug!(
        datasets = bank.len(),
        vertices = base.vertex_count(),
        "merged dataset geometries"
    );
    Ok((base, bank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_common::Color;

    fn fragment(offset: f32, color: Color) -> CellFragment {
        CellFragment {
            positions: vec![[offset, 0.0, 0.0], [offset, 1.0, 0.0], [offset, 0.0, 1.0]],
            indices: vec![0, 1, 2],
            color,
        }
    }

    fn triangle_geometry(n_vertices: usize) -> MergedGeometry {
        MergedGeometry {
            positions: vec![0.0; n_vertices * 3],
            colors: vec![0; n_vertices * 3],
            indices: (0..n_vertices as u32).collect(),
        }
    }

    #[test]
    fn test_merge_cells_offsets_indices() {
        let merged = merge_cells(&[
            fragment(0.0, Color::new(255, 0, 0)),
            fragment(5.0, Color::new(0, 255, 0)),
        ]);

        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.indices, vec![0, 1, 2, 3, 4, 5]);
        // per-vertex flat colors
        assert_eq!(&merged.colors[0..3], &[255, 0, 0]);
        assert_eq!(&merged.colors[9..12], &[0, 255, 0]);
        // second fragment's positions follow the first's
        assert_eq!(merged.positions[9], 5.0);
    }

    #[test]
    fn test_merge_cells_empty() {
        let merged = merge_cells(&[]);
        assert_eq!(merged.vertex_count(), 0);
        assert!(merged.indices.is_empty());
    }

    #[test]
    fn test_merge_datasets_builds_targets_and_bank() {
        let geometries = vec![triangle_geometry(3), triangle_geometry(3), triangle_geometry(3)];
        let (base, bank) = merge_datasets(geometries).unwrap();

        assert_eq!(base.vertex_count(), 3);
        assert_eq!(base.target_count(), 3);
        assert_eq!(bank.len(), 3);
        assert!(bank.color_attribute(2).is_some());
        assert!(bank.color_attribute(3).is_none());
    }

    #[test]
    fn test_merge_datasets_rejects_vertex_mismatch() {
        let err = merge_datasets(vec![triangle_geometry(3), triangle_geometry(6)]).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::ShapeMismatch {
                dataset: 1,
                vertices: 6,
                expected: 3,
            }
        ));
    }

    #[test]
    fn test_merge_datasets_rejects_index_mismatch() {
        let mut odd = triangle_geometry(3);
        odd.indices = vec![0, 1, 2, 0, 2, 1];
        let err = merge_datasets(vec![triangle_geometry(3), odd]).unwrap_err();
        assert!(matches!(err, GeometryError::IndexMismatch { dataset: 1, .. }));
    }

    #[test]
    fn test_merge_datasets_empty_input() {
        assert!(matches!(
            merge_datasets(Vec::new()).unwrap_err(),
            GeometryError::Empty
        ));
    }
}
