#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{animation::AnimationAsset, mesh::MeshAsset, node::SceneAsset, pose::PoseAsset};

/// Everything needed to deform the meshes of one scene.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SceneDocument {
    pub scene: SceneAsset,
    pub meshes: Vec<MeshAsset>,
    pub poses: Vec<PoseAsset>,
    pub animations: Vec<AnimationAsset>,
}

impl SceneDocument {
    pub fn bind_pose(&self) -> Option<&PoseAsset> {
        self.poses
            .iter()
            .find(|pose| pose.kind == crate::pose::PoseKind::Bind)
    }
}
