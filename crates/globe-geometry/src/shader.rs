//! Vertex-stage extension description for the host material.
//!
//! The host's default vertex pipeline blends positions by per-target
//! weights but knows nothing about per-target colors. This module describes
//! the augmentation as data: named insertion points in the host's vertex
//! shader, each carrying replacement source sized to the slot capability.
//! The host performs the actual source substitution.

/// Named extension points in the host's default vertex shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Where the per-target weight uniforms are declared.
    WeightUniformDecls,
    /// The stock normal-morphing stage, suppressed because flat-colored
    /// boxes never blend normals.
    NormalBlendStage,
    /// Where blended positions accumulate into the transformed vertex.
    PositionBlendStage,
    /// Where the per-slot color attributes and the varying are declared.
    ColorAttributeDecls,
    /// Where per-slot colors accumulate into the varying.
    ColorBlendStage,
}

/// One replacement: the insertion point and the source that goes there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderReplacement {
    pub at: InsertionPoint,
    pub source: String,
}

/// The complete vertex-stage augmentation for a given slot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPatch {
    pub replacements: Vec<ShaderReplacement>,
}

impl ShaderPatch {
    /// Generate the patch for a slot capability.
    ///
    /// Every slot contributes one accumulation line for position and one
    /// for color; the weight uniform array is sized to match.
    pub fn for_slots(slots: usize) -> Self {
        let mut position_blend = String::new();
        let mut color_attributes = String::from("varying vec3 vColor;\n");
        let mut color_blend = String::from("vColor.xyz =");

        for slot in 0..slots {
            position_blend.push_str(&format!(
                "transformed += (morphTarget{slot} - position) * morphTargetInfluences[{slot}];\n"
            ));
            color_attributes.push_str(&format!("attribute vec3 morphColor{slot};\n"));
            if slot > 0 {
                color_blend.push_str(" +");
            }
            color_blend.push_str(&format!(
                "\n    morphColor{slot} * morphTargetInfluences[{slot}]"
            ));
        }
        color_blend.push_str(";\n");

        let replacements = vec![
            ShaderReplacement {
                at: InsertionPoint::WeightUniformDecls,
                source: format!("uniform float morphTargetInfluences[{slots}];\n"),
            },
            ShaderReplacement {
                at: InsertionPoint::NormalBlendStage,
                source: String::new(),
            },
            ShaderReplacement {
                at: InsertionPoint::PositionBlendStage,
                source: position_blend,
            },
            ShaderReplacement {
                at: InsertionPoint::ColorAttributeDecls,
                source: color_attributes,
            },
            ShaderReplacement {
                at: InsertionPoint::ColorBlendStage,
                source: color_blend,
            },
        ];

        Self { replacements }
    }

    /// The replacement source for one insertion point, if present.
    pub fn source_for(&self, at: InsertionPoint) -> Option<&str> {
        self.replacements
            .iter()
            .find(|r| r.at == at)
            .map(|r| r.source.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_covers_all_insertion_points() {
        let patch = ShaderPatch::for_slots(4);
        assert_eq!(patch.replacements.len(), 5);
        for at in [
            InsertionPoint::WeightUniformDecls,
            InsertionPoint::NormalBlendStage,
            InsertionPoint::PositionBlendStage,
            InsertionPoint::ColorAttributeDecls,
            InsertionPoint::ColorBlendStage,
        ] {
            assert!(patch.source_for(at).is_some());
        }
    }

    #[test]
    fn test_uniform_array_sized_to_slots() {
        let patch = ShaderPatch::for_slots(8);
        let decls = patch.source_for(InsertionPoint::WeightUniformDecls).unwrap();
        assert!(decls.contains("morphTargetInfluences[8]"));
    }

    #[test]
    fn test_one_attribute_and_accumulation_per_slot() {
        let patch = ShaderPatch::for_slots(3);

        let attrs = patch
            .source_for(InsertionPoint::ColorAttributeDecls)
            .unwrap();
        assert!(attrs.contains("varying vec3 vColor;"));
        assert!(attrs.contains("attribute vec3 morphColor0;"));
        assert!(attrs.contains("attribute vec3 morphColor2;"));
        assert!(!attrs.contains("morphColor3"));

        let blend = patch.source_for(InsertionPoint::PositionBlendStage).unwrap();
        assert!(blend.contains("(morphTarget2 - position) * morphTargetInfluences[2]"));
        assert!(!blend.contains("morphTarget3"));

        let colors = patch.source_for(InsertionPoint::ColorBlendStage).unwrap();
        assert!(colors.contains("morphColor1 * morphTargetInfluences[1]"));
        assert!(colors.trim_end().ends_with(';'));
    }

    #[test]
    fn test_normal_stage_suppressed() {
        let patch = ShaderPatch::for_slots(2);
        assert_eq!(patch.source_for(InsertionPoint::NormalBlendStage), Some(""));
    }
}
