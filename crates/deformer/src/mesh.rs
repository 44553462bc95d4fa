use deformer_asset::{
    animation::AnimationAsset, document::SceneDocument, mesh::MeshAsset, pose::PoseAsset,
};
use glam::DVec3;
use log::{debug, warn};

use crate::{
    animation, blend_shape,
    cluster::{self, ResolvedCluster},
    hierarchy::NodeTransforms,
    pose::PoseResolver,
    skinning::{self, SkinBinding, SkinEvaluator},
    vertex_cache, EvaluationParams, Result,
};

/// Deformation pipeline of one mesh: vertex cache, or blend shapes
/// followed by skinning.
#[derive(Debug)]
pub struct MeshDeformer<'a> {
    index: usize,
    mesh: &'a MeshAsset,
    clamp_shape_weight: bool,
    skin: Option<SkinEvaluator>,
}

impl<'a> MeshDeformer<'a> {
    /// `index` is the position of the mesh in its document, used to find
    /// the curves driving its blend-shape channels.
    pub fn new(index: usize, mesh: &'a MeshAsset, params: &EvaluationParams) -> Result<Self> {
        params.validate()?;

        let skin = if mesh.has_clusters() {
            let binding = SkinBinding::bind(&mesh.skins)?;
            let skipped = skinning::count_out_of_range(&mesh.skins, mesh.vertex_count());
            if skipped > 0 && params.report_skipped_indices {
                warn!(
                    "Mesh {:?}: {} cluster entries reference missing control points",
                    mesh.name, skipped
                );
            }
            let evaluator = SkinEvaluator::new(binding, params);
            debug!(
                "Mesh {:?} skinned as {:?}",
                mesh.name,
                evaluator.skinning_type()
            );
            Some(evaluator)
        } else {
            None
        };

        Ok(Self {
            index,
            mesh,
            clamp_shape_weight: params.clamp_shape_weight,
            skin,
        })
    }

    pub fn mesh(&self) -> &MeshAsset {
        self.mesh
    }

    pub fn skin(&self) -> Option<&SkinEvaluator> {
        self.skin.as_ref()
    }

    /// Deformed control points at `time`, one per bind shape point.
    ///
    /// `resolver` must reflect the scene at the same time.
    pub fn evaluate(
        &self,
        resolver: &PoseResolver,
        animations: &[AnimationAsset],
        time: f64,
    ) -> Vec<DVec3> {
        let mut points = self.mesh.control_points.clone();

        let frame = self
            .mesh
            .vertex_cache
            .as_ref()
            .and_then(|cache| cache.frame_at(time));
        if let Some(frame) = frame {
            if vertex_cache::apply_vertex_cache(&mut points, frame) {
                return points;
            }
        }

        if !self.mesh.blend_shapes.is_empty() {
            let weights = animation::channel_weights(self.index, self.mesh, animations, time);
            debug!("Mesh {:?} channel weights: {:?}", self.mesh.name, weights);
            points = blend_shape::deform(
                &points,
                &self.mesh.blend_shapes,
                &weights,
                self.clamp_shape_weight,
            );
        }

        if let Some(evaluator) = &self.skin {
            let clusters: Vec<ResolvedCluster> = self
                .mesh
                .skins
                .iter()
                .flat_map(|skin| cluster::resolve_clusters(skin, self.mesh.node, resolver))
                .collect();
            let blend_weights = self
                .mesh
                .skins
                .first()
                .map(|skin| skin.blend_weights.as_slice())
                .unwrap_or(&[]);
            points = evaluator.evaluate(&points, &clusters, blend_weights);
        }

        points
    }
}

/// Deform every mesh of a document at `time`.
///
/// Node properties are animated first; `pose` then overrides the global
/// position of the nodes it holds.
pub fn deform_document(
    document: &SceneDocument,
    params: &EvaluationParams,
    pose: Option<&PoseAsset>,
    time: f64,
) -> Result<Vec<Vec<DVec3>>> {
    let scene = animation::apply_animations(&document.scene, &document.animations, time);
    let transforms = NodeTransforms::from_scene(&scene)?;
    let resolver = PoseResolver::new(&scene, &transforms, pose);

    document
        .meshes
        .iter()
        .enumerate()
        .map(|(index, mesh)| {
            let deformer = MeshDeformer::new(index, mesh, params)?;
            Ok(deformer.evaluate(&resolver, &document.animations, time))
        })
        .collect()
}
