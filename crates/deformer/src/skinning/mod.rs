//! Skinning evaluators.
//!
//! Every evaluator reads the shape-deformed control points and the
//! resolved clusters of a mesh and returns new positions, one per input
//! point. Indices beyond the point count and zero weights are ignored.

use deformer_asset::skin::{LinkMode, SkinAsset, SkinningType};
use glam::DVec3;
use log::debug;

use crate::{cluster::ResolvedCluster, BlendFallback, DeformError, EvaluationParams, Result};

pub mod blend;
pub mod dual_quaternion;
pub mod linear;

/// Link mode and skinning type shared by all the clusters of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinBinding {
    link_mode: LinkMode,
    skinning_type: SkinningType,
}

impl SkinBinding {
    /// The first cluster decides the link mode, the first skin the
    /// skinning type.
    pub fn bind(skins: &[SkinAsset]) -> Result<Self> {
        let mut link_mode = None;
        let clusters = skins.iter().flat_map(|skin| skin.clusters.iter());
        for (index, cluster) in clusters.enumerate() {
            if cluster.indices.len() != cluster.weights.len() {
                return Err(DeformError::WeightCountMismatch {
                    cluster: index,
                    indices: cluster.indices.len(),
                    weights: cluster.weights.len(),
                });
            }
            match link_mode {
                None => link_mode = Some(cluster.link_mode),
                Some(expected) if expected != cluster.link_mode => {
                    return Err(DeformError::MixedLinkModes {
                        cluster: index,
                        expected,
                        actual: cluster.link_mode,
                    });
                }
                Some(_) => {}
            }
        }

        let link_mode = link_mode.ok_or(DeformError::EmptySkin)?;
        let skinning_type = skins
            .first()
            .map(|skin| skin.skinning_type)
            .unwrap_or_default();
        debug!("Skin bound: {:?}, {:?}", link_mode, skinning_type);
        Ok(Self {
            link_mode,
            skinning_type,
        })
    }

    pub fn link_mode(&self) -> LinkMode {
        self.link_mode
    }

    pub fn skinning_type(&self) -> SkinningType {
        self.skinning_type
    }
}

/// Number of cluster entries pointing beyond `vertex_count`.
pub fn count_out_of_range(skins: &[SkinAsset], vertex_count: usize) -> usize {
    skins
        .iter()
        .flat_map(|skin| skin.clusters.iter())
        .flat_map(|cluster| cluster.indices.iter())
        .filter(|index| **index >= vertex_count)
        .count()
}

#[derive(Debug, Clone)]
pub struct SkinEvaluator {
    binding: SkinBinding,
    skinning_type: SkinningType,
    blend_fallback: BlendFallback,
}

impl SkinEvaluator {
    pub fn new(binding: SkinBinding, params: &EvaluationParams) -> Self {
        Self {
            binding,
            skinning_type: params
                .skinning_override
                .unwrap_or(binding.skinning_type()),
            blend_fallback: params.blend_fallback,
        }
    }

    /// Skinning type actually evaluated.
    pub fn skinning_type(&self) -> SkinningType {
        self.skinning_type
    }

    pub fn evaluate(
        &self,
        points: &[DVec3],
        clusters: &[ResolvedCluster],
        blend_weights: &[f64],
    ) -> Vec<DVec3> {
        let link_mode = self.binding.link_mode();
        match self.skinning_type {
            SkinningType::Rigid | SkinningType::Linear => {
                linear::deform(points, clusters, link_mode)
            }
            SkinningType::DualQuaternion => dual_quaternion::deform(points, clusters, link_mode),
            SkinningType::Blend => {
                let linear = linear::deform(points, clusters, link_mode);
                let dual_quaternion = dual_quaternion::deform(points, clusters, link_mode);
                blend::combine(
                    points,
                    &linear,
                    &dual_quaternion,
                    blend_weights,
                    self.blend_fallback,
                )
            }
        }
    }
}

/// Visit every usable influence: in range and with a non-zero weight.
fn for_each_influence<'a>(
    clusters: &[ResolvedCluster<'a>],
    vertex_count: usize,
    mut visit: impl FnMut(&ResolvedCluster<'a>, usize, f64),
) {
    for cluster in clusters {
        for (index, weight) in cluster.influences() {
            if index >= vertex_count || weight == 0.0 {
                continue;
            }
            visit(cluster, index, weight);
        }
    }
}
