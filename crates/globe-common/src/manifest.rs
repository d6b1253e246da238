//! Dataset manifest consumed when a session is built.
//!
//! The manifest is an ordered list of fetchable grid sources plus derived
//! datasets computed from pairs of them after all sources have loaded.

use serde::{Deserialize, Serialize};

/// A fetchable grid source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSource {
    /// Display label.
    pub name: String,
    /// Hue ramp endpoints used when mapping normalized values to color.
    pub hue_range: [f32; 2],
    /// Where the ASCII grid text is fetched from (plain GET).
    pub source_url: String,
}

/// Element-wise comparison used to build a derived dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedOp {
    /// `max(base - other, 0)`: how much the base dataset exceeds the other.
    Exceeds,
}

/// A dataset computed from two loaded grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedSource {
    pub name: String,
    pub hue_range: [f32; 2],
    /// Name of the dataset supplying shape, origin and the left operand.
    pub base: String,
    /// Name of the dataset supplying the right operand.
    pub other: String,
    pub op: DerivedOp,
}

/// Ordered dataset manifest. Dataset indices used throughout the pipeline
/// follow this ordering: sources first, derived entries after.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub sources: Vec<GridSource>,
    #[serde(default)]
    pub derived: Vec<DerivedSource>,
}

impl DatasetManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Total number of datasets the manifest describes.
    pub fn dataset_count(&self) -> usize {
        self.sources.len() + self.derived.len()
    }
}
