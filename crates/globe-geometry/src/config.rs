//! Calibration constants and rendering-host capabilities.

use serde::{Deserialize, Serialize};

/// Tuning for cell geometry synthesis.
///
/// The angular corrections align the raster's origin convention with the
/// sphere's own UV/initial orientation. They are calibration constants
/// established against the base globe texture, not derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Radius of the sphere the boxes sit on.
    pub sphere_radius: f32,
    /// Box footprint along both surface axes.
    pub cell_footprint: f32,
    /// Radial extrusion at normalized value 0.
    pub min_extrusion: f32,
    /// Radial extrusion at normalized value 1.
    pub max_extrusion: f32,
    /// Longitude correction in radians.
    pub lon_correction: f32,
    /// Latitude correction in radians.
    pub lat_correction: f32,
    /// Fixed HSL saturation for cell colors.
    pub saturation: f32,
    /// HSL lightness at normalized value 0.
    pub min_lightness: f32,
    /// HSL lightness at normalized value 1.
    pub max_lightness: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 1.0,
            cell_footprint: 0.005,
            min_extrusion: 0.01,
            max_extrusion: 0.5,
            lon_correction: std::f32::consts::PI * 0.5,
            lat_correction: std::f32::consts::PI * -0.135,
            saturation: 1.0,
            min_lightness: 0.4,
            max_lightness: 1.0,
        }
    }
}

/// Capabilities reported by the rendering host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderCaps {
    /// Maximum number of simultaneously bindable color blend targets.
    pub max_color_targets: usize,
}

impl Default for RenderCaps {
    fn default() -> Self {
        Self {
            max_color_targets: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extrusion_range_is_ordered() {
        let config = SynthesisConfig::default();
        assert!(config.min_extrusion < config.max_extrusion);
        assert!(config.min_lightness < config.max_lightness);
    }

    #[test]
    fn test_default_caps() {
        assert_eq!(RenderCaps::default().max_color_targets, 8);
    }
}
