//! Common types shared across the globe-grid workspace.

pub mod color;
pub mod grid;
pub mod manifest;

pub use color::{hsl_to_rgb, lerp, Color};
pub use grid::{Grid, VisibilityMask};
pub use manifest::{DatasetManifest, DerivedOp, DerivedSource, GridSource};
