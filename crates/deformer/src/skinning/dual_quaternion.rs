use deformer_asset::skin::LinkMode;
use glam::DVec3;

use crate::{cluster::ResolvedCluster, dual_quat::DualQuat};

/// Blend the cluster transforms as dual quaternions, which keeps volume
/// where linear blending collapses it.
///
/// Scaling in the cluster matrices is ignored.
pub fn deform(points: &[DVec3], clusters: &[ResolvedCluster], link_mode: LinkMode) -> Vec<DVec3> {
    let count = points.len();
    let mut deformations = vec![DualQuat::ZERO; count];
    let mut weights = vec![0.0; count];
    let mut touched = vec![false; count];

    for cluster in clusters {
        let dual_quat = DualQuat::from_matrix(&cluster.matrix);
        super::for_each_influence(std::slice::from_ref(cluster), count, |_, index, weight| {
            let influence = dual_quat * weight;

            if link_mode == LinkMode::Additive {
                // Only the last cluster counts.
                deformations[index] = influence;
                weights[index] = 1.0;
                return;
            }

            if !touched[index] {
                deformations[index] = influence;
                touched[index] = true;
            } else if deformations[index].dot_real(&dual_quat) >= 0.0 {
                deformations[index] += influence;
            } else {
                // Opposite hemisphere: take the shortest path.
                deformations[index] -= influence;
            }
            weights[index] += weight;
        });
    }

    points
        .iter()
        .zip(deformations.iter().zip(&weights))
        .map(|(point, (deformation, weight))| {
            if *weight == 0.0 {
                return *point;
            }
            // Normalizing already divides out the weight sum.
            let deformed = deformation.normalize().transform_point(*point);
            match link_mode {
                LinkMode::Normalize | LinkMode::Additive => deformed,
                LinkMode::TotalOne => deformed * *weight + *point * (1.0 - *weight),
            }
        })
        .collect()
}
