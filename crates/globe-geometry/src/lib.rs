//! Geometry synthesis, merging and blend-slot multiplexing for the globe.
//!
//! One grid cell becomes one flat-colored box extruded from the unit sphere
//! surface. All boxes of one dataset merge into a single indexed geometry;
//! all dataset geometries merge into one base geometry carrying alternate
//! position targets and a bank of per-dataset color attributes. Because the
//! rendering host binds only a limited number of color targets at once, an
//! influence-ranked multiplexer decides which bank entries occupy the slots.

pub mod config;
pub mod merge;
pub mod multiplex;
pub mod shader;
pub mod synth;

pub use config::{RenderCaps, SynthesisConfig};
pub use merge::{
    merge_cells, merge_datasets, AttributeBank, BaseGeometry, GeometryError, MergedGeometry,
};
pub use multiplex::{remap, BoundSlot, MorphBindings, SlotBinding};
pub use shader::{InsertionPoint, ShaderPatch, ShaderReplacement};
pub use synth::{synthesize_cell, synthesize_grid, CellFragment};
