use deformer_asset::skin::LinkMode;
use glam::{DMat4, DVec3};

use crate::{cluster::ResolvedCluster, math};

/// Weighted sum of the cluster matrices applied to each point.
pub fn deform(points: &[DVec3], clusters: &[ResolvedCluster], link_mode: LinkMode) -> Vec<DVec3> {
    let count = points.len();
    let start = match link_mode {
        LinkMode::Additive => DMat4::IDENTITY,
        _ => DMat4::ZERO,
    };
    let mut deformations = vec![start; count];
    let mut weights = vec![0.0; count];

    super::for_each_influence(clusters, count, |cluster, index, weight| {
        let mut influence = cluster.matrix;
        math::scale_matrix(&mut influence, weight);

        if link_mode == LinkMode::Additive {
            // Blend toward identity, then compose with what is already there.
            math::add_to_diagonal(&mut influence, 1.0 - weight);
            deformations[index] = influence * deformations[index];
            weights[index] = 1.0;
        } else {
            math::add_matrix(&mut deformations[index], &influence);
            weights[index] += weight;
        }
    });

    points
        .iter()
        .zip(deformations.iter().zip(&weights))
        .map(|(point, (deformation, weight))| {
            if *weight == 0.0 {
                return *point;
            }
            let deformed = math::transform_point(deformation, *point);
            match link_mode {
                LinkMode::Normalize => deformed / *weight,
                LinkMode::TotalOne => deformed + *point * (1.0 - *weight),
                LinkMode::Additive => deformed,
            }
        })
        .collect()
}
