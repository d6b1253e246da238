//! Shared test utilities for the globe-grid workspace.
//!
//! Provides ASCII grid text builders, ready-made grids and manifests, and
//! approximate floating-point assertion macros used across member crates.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;

pub use fixtures::*;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of `[x, y, z]` positions.
///
/// ```ignore
/// use test_utils::assert_vec3_approx_eq;
///
/// assert_vec3_approx_eq!([1.0001, 2.0, 0.0], [1.0, 2.0, 0.0], 0.001);
/// ```
#[macro_export]
macro_rules! assert_vec3_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        $crate::assert_approx_eq!(left[0], right[0], $epsilon);
        $crate::assert_approx_eq!(left[1], right[1], $epsilon);
        $crate::assert_approx_eq!(left[2], right[2], $epsilon);
    }};
}
