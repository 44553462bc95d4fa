//! Two-joint reference rig.
//!
//! Four control points along X, bound to a root joint at the origin and a
//! limb joint at [`LIMB_OFFSET`]. Root weights fall from 1 to 0.25 along
//! the points and the limb takes the rest, so bending the limb shows how
//! each skinning type handles a joint.

use deformer_asset::{
    document::SceneDocument,
    index::NodeId,
    mesh::MeshAsset,
    node::{NodeAsset, SceneAsset, TransformProperties},
    skin::{ClusterAsset, LinkMode, SkinAsset, SkinningType},
};
use glam::{DMat4, DVec3};

pub const LIMB_OFFSET: DVec3 = DVec3::new(2.0, 0.0, 0.0);
pub const ROOT_WEIGHTS: [f64; 4] = [1.0, 0.75, 0.5, 0.25];

/// Node of the limb joint in the rig's scene.
pub const LIMB_NODE: NodeId = NodeId(2);

/// Rig with the limb rotated by `angle` degrees about Y.
///
/// Blend skinning mixes both methods evenly on every point.
pub fn two_joint_rig(angle: f64, skinning_type: SkinningType) -> SceneDocument {
    let mut scene = SceneAsset::default();
    let mesh_node = scene.add_node(NodeAsset::new("arm", None));
    let root = scene.add_node(NodeAsset::new("root", None));
    let limb = scene.add_node(NodeAsset::new("limb", Some(root)).with_properties(
        TransformProperties::from_trs(LIMB_OFFSET, DVec3::new(0.0, angle, 0.0), DVec3::ONE),
    ));

    let root_cluster = ClusterAsset::new(root, LinkMode::Normalize)
        .with_influences(ROOT_WEIGHTS.iter().copied().enumerate());
    let limb_cluster = ClusterAsset::new(limb, LinkMode::Normalize)
        .with_influences(ROOT_WEIGHTS.iter().map(|weight| 1.0 - weight).enumerate())
        .with_bind_matrices(DMat4::IDENTITY, DMat4::from_translation(LIMB_OFFSET));

    let mesh = MeshAsset {
        name: Some(String::from("arm")),
        node: mesh_node,
        control_points: (1..=ROOT_WEIGHTS.len())
            .map(|x| DVec3::new(x as f64, 0.0, 0.0))
            .collect(),
        skins: vec![SkinAsset {
            skinning_type,
            clusters: vec![root_cluster, limb_cluster],
            blend_weights: vec![0.5; ROOT_WEIGHTS.len()],
        }],
        ..Default::default()
    };

    SceneDocument {
        scene,
        meshes: vec![mesh],
        ..Default::default()
    }
}
