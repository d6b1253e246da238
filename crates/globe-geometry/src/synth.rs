//! Per-cell geometry synthesis.
//!
//! Each renderable cell becomes an indexed unit box, scaled to the cell
//! footprint and its value-driven extrusion, then placed on the sphere by a
//! longitude/latitude rotation pair. Fragments come out in sphere space so
//! merging needs no further per-fragment transform.

use globe_common::{hsl_to_rgb, lerp, Color, Grid, VisibilityMask};
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use tracing::debug;

use crate::config::SynthesisConfig;

/// Vertices in one box fragment (4 per face).
pub const BOX_VERTEX_COUNT: usize = 24;

/// Unit box corner positions, 4 vertices per face, half extent 0.5.
const BOX_POSITIONS: [[f32; 3]; BOX_VERTEX_COUNT] = [
    // +z
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    // -z
    [0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    // +x
    [0.5, -0.5, 0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [0.5, 0.5, 0.5],
    // -x
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5],
    // +y
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    // -y
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, -0.5, 0.5],
    [-0.5, -0.5, 0.5],
];

/// Two CCW triangles per face.
const BOX_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // +z
    4, 5, 6, 4, 6, 7, // -z
    8, 9, 10, 8, 10, 11, // +x
    12, 13, 14, 12, 14, 15, // -x
    16, 17, 18, 16, 18, 19, // +y
    20, 21, 22, 20, 22, 23, // -y
];

/// One cell's geometry: sphere-space positions, local indices, and the flat
/// color shared by every vertex.
#[derive(Debug, Clone)]
pub struct CellFragment {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub color: Color,
}

/// Synthesize one cell, or nothing when the coordinate is masked out.
///
/// The placement composes: longitude rotation about Y, latitude rotation
/// about X, translation to the sphere surface, non-uniform scaling to the
/// footprint and extrusion, and a half-extrusion origin offset so the box
/// grows outward from the surface instead of straddling it.
pub fn synthesize_cell(
    grid: &Grid,
    row: usize,
    col: usize,
    mask: &VisibilityMask,
    hue_range: [f32; 2],
    config: &SynthesisConfig,
) -> Option<CellFragment> {
    if !mask.is_visible(row, col) {
        return None;
    }
    let value = grid.value(row, col)?;
    let amount = grid.normalized(value) as f32;

    let extrusion = lerp(config.min_extrusion, config.max_extrusion, amount);
    let lon =
        (col as f64 + grid.columns_origin()).to_radians() as f32 + config.lon_correction;
    let lat = (row as f64 + grid.rows_origin()).to_radians() as f32 + config.lat_correction;

    let transform: Matrix4<f32> = Rotation3::from_axis_angle(&Vector3::y_axis(), lon)
        .to_homogeneous()
        * Rotation3::from_axis_angle(&Vector3::x_axis(), lat).to_homogeneous()
        * Translation3::new(0.0, 0.0, config.sphere_radius).to_homogeneous()
        * Matrix4::new_nonuniform_scaling(&Vector3::new(
            config.cell_footprint,
            config.cell_footprint,
            extrusion,
        ))
        * Translation3::new(0.0, 0.0, 0.5).to_homogeneous();

    let positions = BOX_POSITIONS
        .iter()
        .map(|p| {
            let q = transform.transform_point(&Point3::new(p[0], p[1], p[2]));
            [q.x, q.y, q.z]
        })
        .collect();

    let hue = lerp(hue_range[0], hue_range[1], amount);
    let lightness = lerp(config.min_lightness, config.max_lightness, amount);
    let color = hsl_to_rgb(hue, config.saturation, lightness);

    Some(CellFragment {
        positions,
        indices: BOX_INDICES.to_vec(),
        color,
    })
}

/// Synthesize every renderable cell of a grid, row-major.
pub fn synthesize_grid(
    grid: &Grid,
    mask: &VisibilityMask,
    hue_range: [f32; 2],
    config: &SynthesisConfig,
) -> Vec<CellFragment> {
    let mut fragments = Vec::new();
    for row in 0..grid.rows() {
        for col in 0..grid.row_len(row) {
            if let Some(fragment) = synthesize_cell(grid, row, col, mask, hue_range, config) {
                fragments.push(fragment);
            }
        }
    }
    debug!(cells = fragments.len(), "synthesized grid fragments");
    fragments
}
