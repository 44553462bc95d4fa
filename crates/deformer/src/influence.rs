//! Per-vertex joint influences packed for vertex attributes.
//!
//! Each vertex keeps its strongest influences only, sorted by decreasing
//! weight and renormalized, then exported four at a time.

use deformer_asset::{
    index::NodeId,
    node::SceneAsset,
    skin::{ClusterAsset, SkinAsset},
};
use glam::DMat4;
use log::{debug, warn};

pub const DEFAULT_MAX_INFLUENCES: usize = 8;

/// Matrix from mesh space at binding time to joint space.
pub fn inverse_bind_matrix(cluster: &ClusterAsset) -> DMat4 {
    cluster.transform_link.inverse() * cluster.transform
}

/// Joint matrix at its current global position, ready for skinning.
pub fn skinning_matrix(cluster: &ClusterAsset, joint_global: &DMat4) -> DMat4 {
    *joint_global * inverse_bind_matrix(cluster)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Influence {
    /// Cluster index in the skin.
    pub joint: u16,
    pub weight: f32,
}

#[derive(Debug, Clone, Default)]
pub struct PackedInfluences {
    max_influences: usize,
    vertices: Vec<Vec<Influence>>,
}

impl PackedInfluences {
    pub fn max_influences(&self) -> usize {
        self.max_influences
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Influences of a vertex, strongest first.
    pub fn influences(&self, vertex: usize) -> &[Influence] {
        self.vertices.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of four-wide subsets needed to hold every influence.
    pub fn subset_count(&self) -> usize {
        self.max_influences.div_ceil(4)
    }

    /// Influences `4 * subset .. 4 * subset + 4` of a vertex, zero padded.
    pub fn subset(&self, vertex: usize, subset: usize) -> ([u16; 4], [f32; 4]) {
        let mut joints = [0; 4];
        let mut weights = [0.0; 4];
        let influences = self.influences(vertex).iter().skip(subset * 4).take(4);
        for (slot, influence) in influences.enumerate() {
            joints[slot] = influence.joint;
            weights[slot] = influence.weight;
        }
        (joints, weights)
    }
}

/// Keep the `max_influences` largest weights of every vertex.
pub fn pack_influences(
    skin: &SkinAsset,
    vertex_count: usize,
    max_influences: usize,
) -> PackedInfluences {
    let max_influences = max_influences.max(1);
    let mut vertices: Vec<Vec<Influence>> = vec![Vec::with_capacity(max_influences); vertex_count];

    for (cluster_index, cluster) in skin.clusters.iter().enumerate() {
        let joint = match u16::try_from(cluster_index) {
            Ok(joint) => joint,
            Err(_) => {
                warn!("Cluster {} cannot be addressed as a joint", cluster_index);
                break;
            }
        };
        for (index, weight) in cluster.influences() {
            let Some(slots) = vertices.get_mut(index) else {
                debug!(
                    "Cluster {} references control point {} of {}",
                    cluster_index, index, vertex_count
                );
                continue;
            };
            let influence = Influence {
                joint,
                weight: weight as f32,
            };
            // Replace the weakest slot only when beaten.
            let weakest = slots.last().map(|slot| slot.weight).unwrap_or(0.0);
            if slots.len() == max_influences {
                if influence.weight <= weakest {
                    continue;
                }
                slots[max_influences - 1] = influence;
            } else if influence.weight <= 0.0 {
                continue;
            } else {
                slots.push(influence);
            }

            let mut slot = slots.len() - 1;
            while slot > 0 && slots[slot - 1].weight < slots[slot].weight {
                slots.swap(slot - 1, slot);
                slot -= 1;
            }
        }
    }

    for slots in &mut vertices {
        let sum: f32 = slots.iter().map(|slot| slot.weight).sum();
        if sum > 0.0 {
            for slot in slots.iter_mut() {
                slot.weight /= sum;
            }
        }
    }

    PackedInfluences {
        max_influences,
        vertices,
    }
}

/// Index of the first joint whose parent is not a joint itself.
pub fn find_root_joint(scene: &SceneAsset, joints: &[NodeId]) -> Option<usize> {
    joints.iter().position(|joint| {
        match scene.node(*joint).and_then(|node| node.parent) {
            Some(parent) => !joints.contains(&parent),
            None => true,
        }
    })
}

/// Index in `skin.clusters` of the cluster linked to the root joint.
///
/// Clusters without a link are ignored but keep their place in the
/// numbering, which is the one used by [`pack_influences`].
pub fn find_root_cluster(scene: &SceneAsset, skin: &SkinAsset) -> Option<usize> {
    let linked: Vec<(usize, NodeId)> = skin
        .clusters
        .iter()
        .enumerate()
        .filter_map(|(index, cluster)| cluster.link.map(|link| (index, link)))
        .collect();
    let joints: Vec<NodeId> = linked.iter().map(|(_, link)| *link).collect();
    find_root_joint(scene, &joints).map(|root| linked[root].0)
}

#[cfg(test)]
mod test {
    use deformer_asset::{
        index::NodeId,
        node::{NodeAsset, SceneAsset},
        skin::{ClusterAsset, LinkMode, SkinAsset},
    };
    use glam::{DMat4, DVec3};

    use super::*;

    fn skin(weights: &[f64]) -> SkinAsset {
        SkinAsset {
            clusters: weights
                .iter()
                .map(|weight| {
                    ClusterAsset::new(NodeId(0), LinkMode::Normalize).with_influences([(0, *weight)])
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_keeps_strongest() {
        let skin = skin(&[0.1, 0.4, 0.2, 0.3, 0.05]);
        let packed = pack_influences(&skin, 1, 3);
        let joints: Vec<u16> = packed.influences(0).iter().map(|slot| slot.joint).collect();
        assert_eq!(joints, vec![1, 3, 2]);

        let sum: f32 = packed.influences(0).iter().map(|slot| slot.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((packed.influences(0)[0].weight - 0.4 / 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_subsets() {
        let skin = skin(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let packed = pack_influences(&skin, 2, DEFAULT_MAX_INFLUENCES);
        assert_eq!(packed.subset_count(), 2);

        let (joints, _) = packed.subset(0, 0);
        assert_eq!(joints, [5, 4, 3, 2]);
        let (joints, weights) = packed.subset(0, 1);
        assert_eq!(joints, [1, 0, 0, 0]);
        assert_eq!(weights[2], 0.0);

        // Vertex 1 has no influence at all.
        assert_eq!(packed.subset(1, 0), ([0; 4], [0.0; 4]));
    }

    #[test]
    fn test_out_of_range_skipped() {
        let skin = SkinAsset {
            clusters: vec![ClusterAsset::new(NodeId(0), LinkMode::Normalize)
                .with_influences([(3, 1.0), (0, 0.5)])],
            ..Default::default()
        };
        let packed = pack_influences(&skin, 1, 4);
        assert_eq!(packed.vertex_count(), 1);
        assert_eq!(
            packed.influences(0),
            &[Influence {
                joint: 0,
                weight: 1.0
            }]
        );
    }

    #[test]
    fn test_bind_matrices() {
        let cluster = ClusterAsset::new(NodeId(0), LinkMode::Normalize).with_bind_matrices(
            DMat4::from_translation(DVec3::Y),
            DMat4::from_translation(DVec3::X),
        );
        let inverse_bind = inverse_bind_matrix(&cluster);
        let expected = DMat4::from_translation(DVec3::new(-1.0, 1.0, 0.0));
        assert!(inverse_bind.abs_diff_eq(expected, 1e-12));
        // At the bind position the joint moves nothing but the mesh offset.
        let skinning = skinning_matrix(&cluster, &DMat4::from_translation(DVec3::X));
        assert!(skinning.abs_diff_eq(DMat4::from_translation(DVec3::Y), 1e-12));
    }

    #[test]
    fn test_find_root_joint() {
        let mut scene = SceneAsset::default();
        let world = scene.add_node(NodeAsset::new("world", None));
        let hips = scene.add_node(NodeAsset::new("hips", Some(world)));
        let spine = scene.add_node(NodeAsset::new("spine", Some(hips)));
        assert_eq!(find_root_joint(&scene, &[spine, hips]), Some(1));
        assert_eq!(find_root_joint(&scene, &[world, hips]), Some(0));
        assert_eq!(find_root_joint(&scene, &[]), None);
    }

    #[test]
    fn test_find_root_cluster_keeps_cluster_index() {
        let mut scene = SceneAsset::default();
        let hips = scene.add_node(NodeAsset::new("hips", None));
        let spine = scene.add_node(NodeAsset::new("spine", Some(hips)));
        let skin = SkinAsset {
            clusters: vec![
                ClusterAsset::default(),
                ClusterAsset::new(spine, LinkMode::Normalize),
                ClusterAsset::new(hips, LinkMode::Normalize),
            ],
            ..Default::default()
        };
        assert_eq!(find_root_cluster(&scene, &skin), Some(2));
        assert_eq!(find_root_cluster(&scene, &SkinAsset::default()), None);
    }
}
