//! Timed interpolation of blend weights between one-hot selections.
//!
//! Selecting a dataset starts a transition of the full weight vector toward
//! a one-hot target. Transitions are never cancelled: overlapping ones all
//! step each frame in start order and race on the shared weight vector,
//! last write wins per frame. Each transition decrements the outstanding
//! counter exactly once when its duration elapses; the controller is idle
//! when the counter reaches zero.

use globe_common::lerp;
use tracing::debug;

/// Transition length in host time units (milliseconds for a wall-clock
/// driven host).
pub const CROSSFADE_DURATION: f64 = 500.0;

#[derive(Debug, Clone)]
struct Transition {
    start: Vec<f32>,
    target: Vec<f32>,
    started_at: f64,
}

/// Drives the blend weight vector between one-hot states.
#[derive(Debug, Clone)]
pub struct CrossfadeController {
    weights: Vec<f32>,
    transitions: Vec<Transition>,
    outstanding: usize,
    duration: f64,
}

impl CrossfadeController {
    /// A controller over `dataset_count` weights, all starting at zero.
    pub fn new(dataset_count: usize) -> Self {
        Self {
            weights: vec![0.0; dataset_count],
            transitions: Vec::new(),
            outstanding: 0,
            duration: CROSSFADE_DURATION,
        }
    }

    /// The live weight vector, each value in [0, 1].
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Whether any transition is still in flight.
    pub fn is_active(&self) -> bool {
        self.outstanding > 0
    }

    /// Begin a transition toward dataset `target` fully visible, everything
    /// else hidden. Does not cancel in-flight transitions.
    pub fn select(&mut self, target: usize, now: f64) {
        let mut target_weights = vec![0.0; self.weights.len()];
        if let Some(weight) = target_weights.get_mut(target) {
            *weight = 1.0;
        }
        debug!(target, now, "starting crossfade");
        self.transitions.push(Transition {
            start: self.weights.clone(),
            target: target_weights,
            started_at: now,
        });
        self.outstanding += 1;
    }

    /// Step all transitions to `now` with smoothstep easing.
    ///
    /// Returns whether any transition remains active, i.e. whether the host
    /// should keep requesting render passes.
    pub fn update(&mut self, now: f64) -> bool {
        for transition in &self.transitions {
            let progress = ((now - transition.started_at) / self.duration).clamp(0.0, 1.0);
            let eased = smoothstep(progress as f32);
            for (ndx, weight) in self.weights.iter_mut().enumerate() {
                *weight = lerp(transition.start[ndx], transition.target[ndx], eased);
            }
        }

        let before = self.transitions.len();
        self.transitions
            .retain(|t| now - t.started_at < self.duration);
        let completed = before - self.transitions.len();
        self.outstanding -= completed;

        self.outstanding > 0
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
