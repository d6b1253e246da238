//! Common fixtures: grid text builders and ready-made grids.

use std::collections::HashMap;

use globe_common::Grid;

/// Render rows of optional values as ASCII grid text, with an optional
/// `NODATA_value` header. Missing cells are written as the sentinel (or as
/// `-9999` when no sentinel is given, which then parses back as a value).
pub fn asc_text(rows: &[&[Option<f64>]], sentinel: Option<f64>) -> String {
    let mut text = String::new();
    if let Some(sentinel) = sentinel {
        text.push_str(&format!("NODATA_value {}\n", sentinel));
    }
    let missing = sentinel.unwrap_or(-9999.0);
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .map(|cell| cell.unwrap_or(missing).to_string())
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

/// Render fully-present rows as ASCII grid text without a sentinel header.
pub fn asc_text_dense(rows: &[&[f64]]) -> String {
    let mut text = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

/// Build a grid directly from optional-value rows, origin at (0, 0).
pub fn grid_from_rows(rows: &[&[Option<f64>]]) -> Grid {
    let cells = rows.iter().map(|row| row.to_vec()).collect();
    Grid::new(0.0, 0.0, None, cells, HashMap::new())
}

/// Build a fully-present grid from value rows, origin at (0, 0).
pub fn dense_grid(rows: &[&[f64]]) -> Grid {
    let cells = rows
        .iter()
        .map(|row| row.iter().map(|v| Some(*v)).collect())
        .collect();
    Grid::new(0.0, 0.0, None, cells, HashMap::new())
}

/// The 2x2 "men" sample from the end-to-end scenario.
pub fn men_2x2() -> Grid {
    dense_grid(&[&[1.0, 2.0], &[3.0, 4.0]])
}

/// The 2x2 "women" sample from the end-to-end scenario.
pub fn women_2x2() -> Grid {
    dense_grid(&[&[4.0, 3.0], &[2.0, 1.0]])
}

/// Manifest JSON naming two 2x2 sources plus a derived "women > men" entry.
pub fn sample_manifest_json(men_url: &str, women_url: &str) -> String {
    format!(
        r#"{{
            "sources": [
                {{"name": "men", "hue_range": [0.7, 0.3], "source_url": "{men_url}"}},
                {{"name": "women", "hue_range": [0.9, 1.1], "source_url": "{women_url}"}}
            ],
            "derived": [
                {{"name": "women > men", "hue_range": [0.0, 0.4], "base": "women", "other": "men", "op": "exceeds"}},
                {{"name": "men > women", "hue_range": [0.6, 1.1], "base": "men", "other": "women", "op": "exceeds"}}
            ]
        }}"#
    )
}
