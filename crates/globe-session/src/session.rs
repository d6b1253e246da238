//! The globe session: owns grids, geometry, blend state and slot bindings.

use futures::future;
use globe_common::{DatasetManifest, Grid, VisibilityMask};
use globe_geometry::{
    merge_cells, merge_datasets, remap, synthesize_grid, AttributeBank, BaseGeometry, BoundSlot,
    MorphBindings, RenderCaps, ShaderPatch, SynthesisConfig,
};
use tracing::{info, instrument, warn};

use crate::crossfade::CrossfadeController;
use crate::error::{Result, SessionError};
use crate::fetch::SourceFetcher;

/// A named, displayable dataset: its hue ramp and its grid.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub name: String,
    pub hue_range: [f32; 2],
    pub grid: Grid,
}

/// What one render-pass update produced.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutcome {
    /// Whether a transition is still in flight and the host should request
    /// another render pass.
    pub needs_render: bool,
    /// Whether the color slot assignments changed this pass.
    pub rebound: bool,
}

/// Everything the rendering host needs: the combined geometry, the color
/// bank, the live blend weights and the current slot bindings.
///
/// Shared mutable state (weights, bindings) is only touched from the single
/// render-driven control flow, so the session needs no locking.
#[derive(Debug)]
pub struct GlobeSession {
    entries: Vec<DatasetEntry>,
    base_geometry: BaseGeometry,
    bank: AttributeBank,
    controller: CrossfadeController,
    bindings: MorphBindings,
    caps: RenderCaps,
    patch: ShaderPatch,
    weights_dirty: bool,
}

/// Load every manifest source, derive the configured datasets, and build
/// the combined geometry.
///
/// All fetches start concurrently and join once; synthesis begins only
/// after the last fetch completes. Any fetch or parse failure rejects the
/// whole build. The returned session is already crossfading toward dataset
/// 0 from time zero.
#[instrument(skip_all, fields(sources = manifest.sources.len(), derived = manifest.derived.len()))]
pub async fn load_and_build(
    manifest: &DatasetManifest,
    fetcher: &dyn SourceFetcher,
    config: &SynthesisConfig,
    caps: RenderCaps,
) -> Result<GlobeSession> {
    let texts = future::try_join_all(
        manifest
            .sources
            .iter()
            .map(|source| fetcher.fetch(&source.source_url)),
    )
    .await?;

    let mut entries = Vec::with_capacity(manifest.dataset_count());
    for (source, text) in manifest.sources.iter().zip(&texts) {
        let grid = asc_parser::parse(text).map_err(|source_err| SessionError::Parse {
            name: source.name.clone(),
            source: source_err,
        })?;
        entries.push(DatasetEntry {
            name: source.name.clone(),
            hue_range: source.hue_range,
            grid,
        });
    }

    for derived in &manifest.derived {
        let find = |name: &str| {
            entries
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.grid.clone())
                .ok_or_else(|| SessionError::UnknownDataset {
                    entry: derived.name.clone(),
                    name: name.to_string(),
                })
        };
        let base = find(&derived.base)?;
        let other = find(&derived.other)?;
        entries.push(DatasetEntry {
            name: derived.name.clone(),
            hue_range: derived.hue_range,
            grid: grid_compose::combine_op(&base, &other, derived.op),
        });
    }

    // One missing-data pass across every grid, derived ones included, so
    // all datasets build the identical set of renderable cells.
    let grids: Vec<&Grid> = entries.iter().map(|e| &e.grid).collect();
    let mask = VisibilityMask::across(&grids);

    let geometries = entries
        .iter()
        .map(|entry| merge_cells(&synthesize_grid(&entry.grid, &mask, entry.hue_range, config)))
        .collect();
    let (base_geometry, bank) = merge_datasets(geometries)?;

    info!(
        datasets = entries.len(),
        cells = mask.visible_count(),
        vertices = base_geometry.vertex_count(),
        "built globe session"
    );

    let mut session = GlobeSession {
        controller: CrossfadeController::new(entries.len()),
        bindings: MorphBindings::new(),
        patch: ShaderPatch::for_slots(caps.max_color_targets),
        entries,
        base_geometry,
        bank,
        caps,
        weights_dirty: false,
    };
    // Show the first dataset.
    session.select_dataset(0, 0.0);
    Ok(session)
}

impl GlobeSession {
    /// Begin a crossfade toward the given dataset. Out-of-range indices are
    /// ignored.
    pub fn select_dataset(&mut self, index: usize, now: f64) {
        if index >= self.entries.len() {
            warn!(index, datasets = self.entries.len(), "ignoring selection");
            return;
        }
        self.controller.select(index, now);
        self.weights_dirty = true;
    }

    /// Per-render-pass update: step transitions, then reassign color slots
    /// when the weight changes could have altered which datasets matter.
    /// Idle frames (no transition, no pending selection) touch nothing.
    pub fn apply_frame(&mut self, now: f64) -> FrameOutcome {
        if !self.weights_dirty {
            return FrameOutcome {
                needs_render: false,
                rebound: false,
            };
        }

        let active = self.controller.update(now);
        let desired = remap(self.controller.weights(), &self.caps);
        let rebound = self.bindings.apply(desired);
        self.weights_dirty = active;

        FrameOutcome {
            needs_render: active,
            rebound,
        }
    }

    /// The live blend weights, one per dataset.
    pub fn weights(&self) -> &[f32] {
        self.controller.weights()
    }

    /// The loaded and derived datasets, in manifest order.
    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn dataset_count(&self) -> usize {
        self.entries.len()
    }

    /// The combined geometry with its position morph targets.
    pub fn base_geometry(&self) -> &BaseGeometry {
        &self.base_geometry
    }

    /// The full color attribute bank, keyed by dataset index.
    pub fn attribute_bank(&self) -> &AttributeBank {
        &self.bank
    }

    /// The current slot assignments resolved against the bank, ready for
    /// the host to upload.
    pub fn bound_slots(&self) -> Vec<BoundSlot<'_>> {
        self.bindings.resolve(&self.bank)
    }

    /// The vertex-stage augmentation the host applies to its material.
    pub fn shader_patch(&self) -> &ShaderPatch {
        &self.patch
    }
}
