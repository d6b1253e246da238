//! End-to-end pipeline tests with an in-memory fetcher.

use std::collections::HashMap;

use async_trait::async_trait;
use globe_common::DatasetManifest;
use globe_geometry::{RenderCaps, SynthesisConfig};
use globe_session::{
    load_and_build, SessionError, SourceFetcher, CROSSFADE_DURATION,
};
use test_utils::{asc_text_dense, sample_manifest_json};

/// Serves grid text from a map, standing in for the network collaborator.
struct MapFetcher {
    responses: HashMap<String, String>,
}

#[async_trait]
impl SourceFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> globe_session::Result<String> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| SessionError::Fetch {
                url: url.to_string(),
                message: "not found".to_string(),
            })
    }
}

fn sample_fetcher() -> MapFetcher {
    let mut responses = HashMap::new();
    responses.insert(
        "mem://men.asc".to_string(),
        asc_text_dense(&[&[1.0, 2.0], &[3.0, 4.0]]),
    );
    responses.insert(
        "mem://women.asc".to_string(),
        asc_text_dense(&[&[4.0, 3.0], &[2.0, 1.0]]),
    );
    MapFetcher { responses }
}

fn sample_manifest() -> DatasetManifest {
    DatasetManifest::from_json(&sample_manifest_json("mem://men.asc", "mem://women.asc")).unwrap()
}

#[tokio::test]
async fn test_end_to_end_build() {
    let session = load_and_build(
        &sample_manifest(),
        &sample_fetcher(),
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap();

    // 2 sources + 2 derived datasets, manifest order.
    assert_eq!(session.dataset_count(), 4);
    let entries = session.entries();
    assert_eq!(entries[0].name, "men");
    assert_eq!(entries[2].name, "women > men");

    // Derived "women > men" = [[3,1],[0,0]], min 0, max 3, all present.
    let derived = &entries[2].grid;
    assert_eq!(derived.value(0, 0), Some(3.0));
    assert_eq!(derived.value(0, 1), Some(1.0));
    assert_eq!(derived.value(1, 0), Some(0.0));
    assert_eq!(derived.value(1, 1), Some(0.0));
    assert_eq!(derived.min(), Some(0.0));
    assert_eq!(derived.max(), Some(3.0));

    // No missing inputs: every cell renders, 24 vertices per box, and every
    // dataset contributes one position target of identical size.
    let base = session.base_geometry();
    assert_eq!(base.vertex_count(), 4 * 24);
    assert_eq!(base.target_count(), 4);
    for target in &base.morph_positions {
        assert_eq!(target.len(), base.positions.len());
    }
    assert_eq!(session.attribute_bank().len(), 4);
}

#[tokio::test]
async fn test_initial_crossfade_lands_on_first_dataset() {
    let mut session = load_and_build(
        &sample_manifest(),
        &sample_fetcher(),
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap();

    // The build starts a transition toward dataset 0 at time zero.
    let mid = session.apply_frame(CROSSFADE_DURATION / 2.0);
    assert!(mid.needs_render);
    assert!(mid.rebound);
    assert!(session.weights()[0] > 0.0);

    let done = session.apply_frame(CROSSFADE_DURATION);
    assert!(!done.needs_render);
    assert_eq!(session.weights(), &[1.0, 0.0, 0.0, 0.0]);

    let slots = session.bound_slots();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].dataset, 0);
    assert_eq!(slots[0].attribute_name(), "morphColor0");
}

#[tokio::test]
async fn test_selection_rebinds_slots_once() {
    let mut session = load_and_build(
        &sample_manifest(),
        &sample_fetcher(),
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap();
    session.apply_frame(CROSSFADE_DURATION);

    session.select_dataset(2, 1000.0);
    let first = session.apply_frame(1100.0);
    assert!(first.needs_render);
    // Both the fading and the rising dataset are bound mid-transition.
    let bound: Vec<usize> = session.bound_slots().iter().map(|s| s.dataset).collect();
    assert_eq!(bound, vec![0, 2]);

    // Mid-transition frames keep the same relevant set: no rebind churn.
    let second = session.apply_frame(1200.0);
    assert!(!second.rebound);

    let done = session.apply_frame(1000.0 + CROSSFADE_DURATION);
    assert!(!done.needs_render);
    let bound: Vec<usize> = session.bound_slots().iter().map(|s| s.dataset).collect();
    assert_eq!(bound, vec![2]);

    // Idle frames after completion change nothing.
    let idle = session.apply_frame(5000.0);
    assert!(!idle.needs_render);
    assert!(!idle.rebound);
}

#[tokio::test]
async fn test_fetch_failure_aborts_whole_build() {
    let mut manifest = sample_manifest();
    manifest.sources[1].source_url = "mem://missing.asc".to_string();

    let err = load_and_build(
        &manifest,
        &sample_fetcher(),
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SessionError::Fetch { .. }));
}

#[tokio::test]
async fn test_unknown_derived_reference_fails() {
    let mut manifest = sample_manifest();
    manifest.derived[0].other = "children".to_string();

    let err = load_and_build(
        &manifest,
        &sample_fetcher(),
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SessionError::UnknownDataset { .. }));
}

#[tokio::test]
async fn test_missing_cells_align_across_datasets() {
    let mut responses = HashMap::new();
    // One sentinel cell in "men" only: the coordinate must disappear from
    // every dataset's geometry.
    responses.insert(
        "mem://men.asc".to_string(),
        "NODATA_value -9999\n1 -9999\n3 4\n".to_string(),
    );
    responses.insert(
        "mem://women.asc".to_string(),
        "NODATA_value -9999\n4 3\n2 1\n".to_string(),
    );
    let fetcher = MapFetcher { responses };

    let session = load_and_build(
        &sample_manifest(),
        &fetcher,
        &SynthesisConfig::default(),
        RenderCaps::default(),
    )
    .await
    .unwrap();

    // 3 renderable cells instead of 4, identical across all 4 datasets.
    let base = session.base_geometry();
    assert_eq!(base.vertex_count(), 3 * 24);
    for target in &base.morph_positions {
        assert_eq!(target.len(), base.positions.len());
    }
}
