//! Per-cluster deformation matrices.
//!
//! A cluster moves the control points it influences by the displacement of
//! its link relative to the mesh, between binding time and now.

use deformer_asset::{
    index::NodeId,
    skin::{ClusterAsset, LinkMode, SkinAsset},
};
use glam::DMat4;
use log::{trace, warn};

use crate::pose::PoseResolver;

/// Current positions around one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterBindings {
    /// Current global position of the mesh, geometry offset included.
    pub mesh_current: DMat4,
    pub mesh_geometry: DMat4,
    pub link_current: DMat4,
    pub link_geometry: DMat4,
    pub associate_current: DMat4,
    pub associate_geometry: DMat4,
}

impl Default for ClusterBindings {
    fn default() -> Self {
        Self {
            mesh_current: DMat4::IDENTITY,
            mesh_geometry: DMat4::IDENTITY,
            link_current: DMat4::IDENTITY,
            link_geometry: DMat4::IDENTITY,
            associate_current: DMat4::IDENTITY,
            associate_geometry: DMat4::IDENTITY,
        }
    }
}

/// Matrix moving a bound control point to its current position.
pub fn vertex_transform(cluster: &ClusterAsset, bindings: &ClusterBindings) -> DMat4 {
    let reference_init = cluster.transform * bindings.mesh_geometry;

    if cluster.link_mode == LinkMode::Additive && cluster.associate_model.is_some() {
        let associate_init = cluster.transform_associate_model * bindings.associate_geometry;
        let link_init = cluster.transform_link * bindings.link_geometry;
        reference_init.inverse()
            * associate_init
            * bindings.associate_current.inverse()
            * bindings.link_current
            * link_init.inverse()
            * reference_init
    } else {
        let relative_init = cluster.transform_link.inverse() * reference_init;
        let relative_current_inverse = bindings.mesh_current.inverse() * bindings.link_current;
        relative_current_inverse * relative_init
    }
}

/// A cluster with its resolved deformation matrix.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCluster<'a> {
    pub cluster: &'a ClusterAsset,
    pub matrix: DMat4,
}

impl<'a> ResolvedCluster<'a> {
    pub fn new(cluster: &'a ClusterAsset, matrix: DMat4) -> Self {
        Self { cluster, matrix }
    }

    pub fn influences(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        let cluster: &'a ClusterAsset = self.cluster;
        cluster.influences()
    }
}

/// Resolve the clusters of a skin bound to the mesh owned by `mesh_node`.
///
/// Clusters without a link are skipped.
pub fn resolve_clusters<'a>(
    skin: &'a SkinAsset,
    mesh_node: NodeId,
    resolver: &PoseResolver,
) -> Vec<ResolvedCluster<'a>> {
    let mesh_geometry = resolver.geometry(mesh_node);
    let mesh_current = resolver.global_position(mesh_node) * mesh_geometry;

    skin.clusters
        .iter()
        .enumerate()
        .filter_map(|(index, cluster)| {
            let link = match cluster.link {
                Some(link) => link,
                None => {
                    warn!("Cluster {} has no link, skipped", index);
                    return None;
                }
            };
            let mut bindings = ClusterBindings {
                mesh_current,
                mesh_geometry,
                link_current: resolver.global_position(link),
                link_geometry: resolver.geometry(link),
                ..Default::default()
            };
            if let Some(associate) = cluster.associate_model {
                bindings.associate_current = resolver.global_position(associate);
                bindings.associate_geometry = resolver.geometry(associate);
            }
            let matrix = vertex_transform(cluster, &bindings);
            trace!("Cluster {} linked to {}: {:?}", index, link, matrix);
            Some(ResolvedCluster::new(cluster, matrix))
        })
        .collect()
}
