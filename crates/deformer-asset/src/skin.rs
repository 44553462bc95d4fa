use glam::DMat4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

/// How the contributions of several clusters combine on one control point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkMode {
    /// Weights are divided by their sum.
    #[default]
    Normalize,
    /// Each cluster composes on top of the previous ones.
    Additive,
    /// The remainder up to 1 stays at the bind position.
    TotalOne,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SkinningType {
    Rigid,
    #[default]
    Linear,
    DualQuaternion,
    Blend,
}

/// Binding between one joint and a weighted subset of control points.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ClusterAsset {
    pub name: Option<String>,
    pub link: Option<NodeId>,
    pub associate_model: Option<NodeId>,
    pub link_mode: LinkMode,
    pub indices: Vec<usize>,
    pub weights: Vec<f64>,
    /// Global transform of the mesh at binding time.
    pub transform: DMat4,
    /// Global transform of the joint at binding time.
    pub transform_link: DMat4,
    /// Global transform of the associate model at binding time.
    pub transform_associate_model: DMat4,
}

impl Default for ClusterAsset {
    fn default() -> Self {
        Self {
            name: None,
            link: None,
            associate_model: None,
            link_mode: LinkMode::default(),
            indices: Vec::new(),
            weights: Vec::new(),
            transform: DMat4::IDENTITY,
            transform_link: DMat4::IDENTITY,
            transform_associate_model: DMat4::IDENTITY,
        }
    }
}

impl ClusterAsset {
    pub fn new(link: NodeId, link_mode: LinkMode) -> Self {
        Self {
            link: Some(link),
            link_mode,
            ..Default::default()
        }
    }

    pub fn with_influences(mut self, influences: impl IntoIterator<Item = (usize, f64)>) -> Self {
        for (index, weight) in influences {
            self.indices.push(index);
            self.weights.push(weight);
        }
        self
    }

    pub fn with_bind_matrices(mut self, transform: DMat4, transform_link: DMat4) -> Self {
        self.transform = transform;
        self.transform_link = transform_link;
        self
    }

    pub fn influences(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.weights.iter().copied())
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SkinAsset {
    pub skinning_type: SkinningType,
    pub clusters: Vec<ClusterAsset>,
    /// Per control point weight between linear (0) and dual quaternion (1),
    /// only read by [`SkinningType::Blend`].
    pub blend_weights: Vec<f64>,
}
