use deformer_asset::{index::NodeId, node::SceneAsset, pose::PoseAsset};
use glam::DMat4;
use log::warn;

use crate::{hierarchy::NodeTransforms, math};

/// Current global position of nodes, taken from a pose when it holds the
/// node and from the evaluated hierarchy otherwise.
pub struct PoseResolver<'a> {
    scene: &'a SceneAsset,
    transforms: &'a NodeTransforms,
    pose: Option<&'a PoseAsset>,
}

impl<'a> PoseResolver<'a> {
    pub fn new(
        scene: &'a SceneAsset,
        transforms: &'a NodeTransforms,
        pose: Option<&'a PoseAsset>,
    ) -> Self {
        Self {
            scene,
            transforms,
            pose,
        }
    }

    pub fn global_position(&self, node: NodeId) -> DMat4 {
        // Local pose entries are relative to the parent's resolved position.
        let mut relative = DMat4::IDENTITY;
        let mut current = node;
        for _ in 0..=self.transforms.len() {
            match self.pose.and_then(|pose| pose.entry(current)) {
                Some(entry) if !entry.local => return entry.matrix * relative,
                Some(entry) => {
                    relative = entry.matrix * relative;
                    match self.transforms.parent(current) {
                        Some(parent) => current = parent,
                        None => return relative,
                    }
                }
                None => return self.animated_position(current) * relative,
            }
        }
        warn!("Pose parent chain of node {} does not end", node);
        relative
    }

    fn animated_position(&self, node: NodeId) -> DMat4 {
        match self.transforms.global(node) {
            Some(global) => global,
            None => {
                warn!("No transform for node {}", node);
                DMat4::IDENTITY
            }
        }
    }

    /// Offset of the geometry attached to the node.
    pub fn geometry(&self, node: NodeId) -> DMat4 {
        self.scene
            .node(node)
            .map(|node| math::geometry_matrix(&node.properties))
            .unwrap_or(DMat4::IDENTITY)
    }
}
