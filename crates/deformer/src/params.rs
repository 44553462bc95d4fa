#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use deformer_asset::skin::SkinningType;

use crate::{influence::DEFAULT_MAX_INFLUENCES, DeformError, Result};

/// Result kept by blend skinning for points without a blend weight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlendFallback {
    #[default]
    Linear,
    DualQuaternion,
    /// Leave the point at its input position.
    Bind,
    /// Blend with this weight.
    Fixed(f64),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EvaluationParams {
    /// Force a skinning type instead of the one declared by the skin.
    pub skinning_override: Option<SkinningType>,
    pub blend_fallback: BlendFallback,
    /// Influences kept per point when packing for export.
    pub max_influences: usize,
    /// Blend-shape weights above the last threshold reach the last target
    /// instead of leaving the points untouched.
    pub clamp_shape_weight: bool,
    /// Log every skipped control point index.
    pub report_skipped_indices: bool,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            skinning_override: None,
            blend_fallback: BlendFallback::default(),
            max_influences: DEFAULT_MAX_INFLUENCES,
            clamp_shape_weight: true,
            report_skipped_indices: true,
        }
    }
}

impl EvaluationParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_influences == 0 {
            return Err(DeformError::BadParams(String::from(
                "max_influences must be at least 1",
            )));
        }
        if let BlendFallback::Fixed(weight) = self.blend_fallback {
            if !(0.0..=1.0).contains(&weight) {
                return Err(DeformError::BadParams(format!(
                    "fixed blend weight {} is outside [0, 1]",
                    weight
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{BlendFallback, EvaluationParams};

    #[test]
    fn test_validate() {
        assert!(EvaluationParams::default().validate().is_ok());

        let params = EvaluationParams {
            max_influences: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = EvaluationParams {
            blend_fallback: BlendFallback::Fixed(1.5),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json() {
        let params: EvaluationParams =
            serde_json::from_str(r#"{ "max_influences": 4, "blend_fallback": "Bind" }"#).unwrap();
        assert_eq!(params.max_influences, 4);
        assert_eq!(params.blend_fallback, BlendFallback::Bind);
        assert!(params.clamp_shape_weight);
    }
}
