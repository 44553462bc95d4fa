use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TargetShape {
    pub name: Option<String>,
    /// Channel weight (0 to 100) at which this shape is fully reached.
    pub full_weight: f64,
    pub control_points: Vec<DVec3>,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BlendShapeChannel {
    pub name: Option<String>,
    /// Weight used when no animation drives the channel, 0 to 100.
    pub deform_percent: f64,
    /// In-between targets ordered by increasing full weight.
    pub targets: Vec<TargetShape>,
}

impl BlendShapeChannel {
    pub fn full_weights(&self) -> Vec<f64> {
        self.targets.iter().map(|target| target.full_weight).collect()
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BlendShapeAsset {
    pub name: Option<String>,
    pub channels: Vec<BlendShapeChannel>,
}
