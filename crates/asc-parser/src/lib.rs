//! Parser for ASCII grid files (ESRI `.asc` style).
//!
//! The format is line oriented: header lines of `KEY VALUE` pairs (corner
//! coordinates, cell size, the no-data sentinel), followed by rows of
//! whitespace-separated numeric values, one row per line. Rows are not
//! validated against each other, so ragged input parses as-is.
//!
//! A token exactly equal to the `NODATA_value` sentinel becomes a missing
//! cell, distinct from a measured zero. A file that never defines the
//! sentinel is accepted; the comparison simply never matches.

use std::collections::HashMap;

use globe_common::Grid;
use thiserror::Error;
use tracing::{debug, warn};

/// Header key naming the longitude offset of cell (0, 0).
const KEY_COLUMNS_ORIGIN: &str = "xllcorner";
/// Header key naming the latitude offset of cell (0, 0).
const KEY_ROWS_ORIGIN: &str = "yllcorner";
/// Header key naming the missing-value sentinel.
const KEY_NO_DATA: &str = "NODATA_value";

/// Errors raised while parsing grid text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token could not be read as a number (strict mode only).
    #[error("malformed numeric token '{token}' on line {line}")]
    MalformedToken { token: String, line: usize },
}

/// How malformed numeric tokens are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Malformed tokens become NaN cells. NaN stays in the grid but is
    /// excluded from the min/max extents.
    #[default]
    Lenient,
    /// Malformed tokens fail the parse with [`ParseError::MalformedToken`].
    Strict,
}

/// Parse grid text leniently (malformed tokens become NaN cells).
pub fn parse(text: &str) -> Result<Grid, ParseError> {
    parse_with_mode(text, ParseMode::Lenient)
}

/// Parse grid text with an explicit token-error policy.
///
/// Header and data lines are distinguished per line: a line of exactly two
/// tokens whose first token is not numeric is a `KEY VALUE` header;
/// otherwise a line of two or more tokens is a data row. Lines with fewer
/// than two tokens are skipped.
pub fn parse_with_mode(text: &str, mode: ParseMode) -> Result<Grid, ParseError> {
    let mut columns_origin = 0.0;
    let mut rows_origin = 0.0;
    let mut no_data_value = None;
    let mut metadata = HashMap::new();
    let mut cells: Vec<Vec<Option<f64>>> = Vec::new();

    for (line_ndx, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            continue;
        }

        if tokens.len() == 2 && tokens[0].parse::<f64>().is_err() {
            let value = parse_token(tokens[1], line_ndx + 1, mode)?;
            match tokens[0] {
                KEY_COLUMNS_ORIGIN => columns_origin = value,
                KEY_ROWS_ORIGIN => rows_origin = value,
                KEY_NO_DATA => no_data_value = Some(value),
                key => {
                    metadata.insert(key.to_string(), value);
                }
            }
            continue;
        }

        let mut row = Vec::with_capacity(tokens.len());
        for token in tokens {
            let value = parse_token(token, line_ndx + 1, mode)?;
            // Sentinel comparison is exact; an undefined sentinel never
            // matches, and NaN never equals anything.
            if Some(value) == no_data_value {
                row.push(None);
            } else {
                row.push(Some(value));
            }
        }
        cells.push(row);
    }

    debug!(
        rows = cells.len(),
        sentinel = ?no_data_value,
        "parsed grid text"
    );

    Ok(Grid::new(
        columns_origin,
        rows_origin,
        no_data_value,
        cells,
        metadata,
    ))
}

fn parse_token(token: &str, line: usize, mode: ParseMode) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => match mode {
            ParseMode::Lenient => {
                warn!(token, line, "malformed numeric token, recording NaN");
                Ok(f64::NAN)
            }
            ParseMode::Strict => Err(ParseError::MalformedToken {
                token: token.to_string(),
                line,
            }),
        },
    }
}
