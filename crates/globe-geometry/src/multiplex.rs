//! Influence-based multiplexing of color attributes onto limited slots.
//!
//! The rendering host binds only `RenderCaps::max_color_targets` color blend
//! attributes at once, while the session may carry more datasets than that.
//! Whenever the blend weights change in a way that can alter which datasets
//! matter, the weights are re-ranked and the winning datasets' color
//! attributes from the bank replace the previous slot assignments wholesale.
//!
//! Assumed (not enforced): the crossfade controller only ever animates
//! between a handful of non-zero weights at once, so the top-N cap never
//! drops a dataset with visible influence.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::RenderCaps;
use crate::merge::AttributeBank;

/// One slot assignment: which dataset's color attribute occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    pub slot: usize,
    pub dataset: usize,
}

/// A slot binding resolved against the bank, ready for the host to upload.
#[derive(Debug, Clone, Copy)]
pub struct BoundSlot<'a> {
    pub slot: usize,
    pub dataset: usize,
    pub colors: &'a [u8],
}

impl BoundSlot<'_> {
    /// The attribute name the host's shader patch expects for this slot.
    pub fn attribute_name(&self) -> String {
        format!("morphColor{}", self.slot)
    }
}

/// Pick which datasets occupy the limited color slots.
///
/// Datasets are ranked by descending absolute weight, capped at the slot
/// count, then re-sorted by ascending dataset index for a stable binding
/// order, and entries with exactly zero weight are dropped.
pub fn remap(weights: &[f32], caps: &RenderCaps) -> Vec<SlotBinding> {
    let mut ranked: Vec<(usize, f32)> = weights.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(caps.max_color_targets);
    ranked.sort_by_key(|&(dataset, _)| dataset);

    ranked
        .into_iter()
        .filter(|&(_, weight)| weight != 0.0)
        .enumerate()
        .map(|(slot, (dataset, _))| SlotBinding { slot, dataset })
        .collect()
}

/// The live slot assignments on the mesh.
///
/// `apply` always replaces the full set, never patches it, so a rebind can
/// never leave a stale attribute bound; applying the same set twice is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct MorphBindings {
    bound: Vec<SlotBinding>,
}

impl MorphBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bound set. Returns whether anything changed.
    pub fn apply(&mut self, bindings: Vec<SlotBinding>) -> bool {
        if self.bound == bindings {
            return false;
        }
        debug!(slots = bindings.len(), "rebinding color slots");
        self.bound = bindings;
        true
    }

    /// The current slot assignments.
    pub fn bound(&self) -> &[SlotBinding] {
        &self.bound
    }

    /// Resolve the current assignments against the bank.
    ///
    /// Assignments pointing outside the bank are skipped; the multiplexer
    /// only produces indices the bank owns.
    pub fn resolve<'a>(&self, bank: &'a AttributeBank) -> Vec<BoundSlot<'a>> {
        self.bound
            .iter()
            .filter_map(|binding| {
                bank.color_attribute(binding.dataset).map(|colors| BoundSlot {
                    slot: binding.slot,
                    dataset: binding.dataset,
                    colors,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(n: usize) -> RenderCaps {
        RenderCaps {
            max_color_targets: n,
        }
    }

    fn datasets(bindings: &[SlotBinding]) -> Vec<usize> {
        bindings.iter().map(|b| b.dataset).collect()
    }

    #[test]
    fn test_ten_datasets_two_active() {
        // 10 datasets, 8 slots: datasets 1 and 3 are bound, ascending, and
        // every zero-weight dataset is excluded.
        let weights = [0.0, 0.9, 0.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let bindings = remap(&weights, &caps(8));

        assert_eq!(datasets(&bindings), vec![1, 3]);
        assert_eq!(bindings[0].slot, 0);
        assert_eq!(bindings[1].slot, 1);
    }

    #[test]
    fn test_cap_keeps_highest_influences() {
        // 4 non-zero weights but only 2 slots: the two largest survive,
        // bound in ascending dataset order.
        let weights = [0.1, 0.8, 0.3, 0.6];
        let bindings = remap(&weights, &caps(2));
        assert_eq!(datasets(&bindings), vec![1, 3]);
    }

    #[test]
    fn test_ranking_uses_absolute_weight() {
        let weights = [-0.9, 0.2, 0.0];
        let bindings = remap(&weights, &caps(1));
        assert_eq!(datasets(&bindings), vec![0]);
    }

    #[test]
    fn test_all_zero_weights_bind_nothing() {
        let weights = [0.0; 6];
        assert!(remap(&weights, &caps(8)).is_empty());
    }

    #[test]
    fn test_slots_are_contiguous_from_zero() {
        let weights = [0.0, 0.5, 0.0, 0.0, 0.5, 0.5];
        let bindings = remap(&weights, &caps(8));
        let slots: Vec<usize> = bindings.iter().map(|b| b.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(datasets(&bindings), vec![1, 4, 5]);
    }

    #[test]
    fn test_apply_reports_change_and_idempotence() {
        let mut bindings = MorphBindings::new();
        let set = remap(&[1.0, 0.0], &caps(8));

        assert!(bindings.apply(set.clone()));
        assert!(!bindings.apply(set));
        assert_eq!(bindings.bound().len(), 1);
    }

    #[test]
    fn test_apply_fully_replaces_previous_set() {
        let mut bindings = MorphBindings::new();
        bindings.apply(remap(&[1.0, 1.0, 1.0], &caps(8)));
        assert_eq!(bindings.bound().len(), 3);

        bindings.apply(remap(&[0.0, 0.0, 1.0], &caps(8)));
        assert_eq!(datasets(bindings.bound()), vec![2]);
    }
}
