//! Grid data model for parsed geographic datasets.

use std::collections::HashMap;

/// A parsed rectangular dataset with geographic origin metadata and a
/// missing-value sentinel.
///
/// A grid is created once, by parsing or by combination, and never mutated
/// afterwards. `min`/`max` cover the non-missing finite values and are
/// computed at construction time.
#[derive(Debug, Clone)]
pub struct Grid {
    columns_origin: f64,
    rows_origin: f64,
    no_data_value: Option<f64>,
    cells: Vec<Vec<Option<f64>>>,
    metadata: HashMap<String, f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Grid {
    /// Build a grid from its parts, computing `min`/`max` in a single pass.
    ///
    /// Non-finite values (NaN from lenient parsing) stay in the cells but
    /// are excluded from the extents.
    pub fn new(
        columns_origin: f64,
        rows_origin: f64,
        no_data_value: Option<f64>,
        cells: Vec<Vec<Option<f64>>>,
        metadata: HashMap<String, f64>,
    ) -> Self {
        let mut min = None;
        let mut max = None;
        for value in cells.iter().flatten().flatten() {
            if !value.is_finite() {
                continue;
            }
            min = Some(min.map_or(*value, |m: f64| m.min(*value)));
            max = Some(max.map_or(*value, |m: f64| m.max(*value)));
        }
        Self {
            columns_origin,
            rows_origin,
            no_data_value,
            cells,
            metadata,
            min,
            max,
        }
    }

    /// Geographic longitude offset of cell (0, 0) in degrees.
    pub fn columns_origin(&self) -> f64 {
        self.columns_origin
    }

    /// Geographic latitude offset of cell (0, 0) in degrees.
    pub fn rows_origin(&self) -> f64 {
        self.rows_origin
    }

    /// The sentinel marking unmeasured cells, if one was defined.
    pub fn no_data_value(&self) -> Option<f64> {
        self.no_data_value
    }

    /// Remaining numeric header properties (ncols, nrows, cellsize, ...).
    pub fn metadata(&self) -> &HashMap<String, f64> {
        &self.metadata
    }

    /// Smallest non-missing value, `None` when every cell is missing.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Largest non-missing value, `None` when every cell is missing.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Number of data rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns in one row. Rows may be ragged, so the length is
    /// per row; out-of-range rows report zero.
    pub fn row_len(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    /// The value at a coordinate. `None` for missing cells and for
    /// coordinates outside the grid.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied()?
    }

    /// Whether a coordinate holds a measured value.
    pub fn is_present(&self, row: usize, col: usize) -> bool {
        self.value(row, col).is_some()
    }

    /// Normalize a value against the grid extents into [0, 1].
    ///
    /// A degenerate range (all values equal, or an empty grid) maps to 0.
    pub fn normalized(&self, value: f64) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) if max > min => (value - min) / (max - min),
            _ => 0.0,
        }
    }
}

/// The cross-dataset renderable-cell mask.
///
/// A cell is visible only when every grid in the set holds a value at that
/// coordinate. Computing this once before any geometry is built guarantees
/// that all datasets produce the identical set of cells, and therefore the
/// identical vertex counts their morph blending relies on.
#[derive(Debug, Clone)]
pub struct VisibilityMask {
    rows: Vec<Vec<bool>>,
}

impl VisibilityMask {
    /// Compute the mask across a set of grids, shaped like the first grid.
    pub fn across(grids: &[&Grid]) -> Self {
        let Some(first) = grids.first() else {
            return Self { rows: Vec::new() };
        };
        let rows = (0..first.rows())
            .map(|row| {
                (0..first.row_len(row))
                    .map(|col| grids.iter().all(|g| g.is_present(row, col)))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Whether the cell at a coordinate is renderable in every dataset.
    pub fn is_visible(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Total number of renderable cells.
    pub fn visible_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|v| **v).count())
            .sum()
    }
}
