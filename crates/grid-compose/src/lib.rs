//! Derives new grids from existing ones by element-wise combination.
//!
//! The derived grid keeps the base grid's shape and origin metadata. A cell
//! is combined only when both inputs hold a value at that coordinate;
//! otherwise the result is missing, including when the other grid lacks the
//! coordinate entirely. Extents are recomputed from the derived data alone.

use globe_common::{DerivedOp, Grid};
use tracing::debug;

/// Combine two grids element-wise into a new grid shaped like `base`.
pub fn combine<F>(base: &Grid, other: &Grid, f: F) -> Grid
where
    F: Fn(f64, f64) -> f64,
{
    let cells = (0..base.rows())
        .map(|row| {
            (0..base.row_len(row))
                .map(|col| match (base.value(row, col), other.value(row, col)) {
                    (Some(a), Some(b)) => Some(f(a, b)),
                    _ => None,
                })
                .collect()
        })
        .collect();

    let derived = Grid::new(
        base.columns_origin(),
        base.rows_origin(),
        base.no_data_value(),
        cells,
        base.metadata().clone(),
    );
    debug!(
        rows = derived.rows(),
        min = ?derived.min(),
        max = ?derived.max(),
        "combined grids"
    );
    derived
}

/// Combine two grids with a named manifest operation.
pub fn combine_op(base: &Grid, other: &Grid, op: DerivedOp) -> Grid {
    match op {
        DerivedOp::Exceeds => combine(base, other, exceeds),
    }
}

/// How much `a` exceeds `b`, floored at zero.
pub fn exceeds(a: f64, b: f64) -> f64 {
    (a - b).max(0.0)
}
