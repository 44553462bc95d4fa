//! Global transforms of scene nodes.
//!
//! A node's local matrix chains its pivots and offsets around the
//! rotation and scaling. The global matrix does not simply multiply the
//! parent global with that local matrix: rotation and scaling are split
//! and recombined according to the node's [`InheritType`].

use deformer_asset::{
    index::NodeId,
    node::{InheritType, SceneAsset, TransformProperties},
};
use glam::{DMat4, DVec3};
use log::{debug, trace};

use crate::{math, DeformError, Result};

/// `T * Roff * Rp * Rpre * R * Rpost * Rp⁻¹ * Soff * Sp * S * Sp⁻¹`
pub fn local_full_matrix(properties: &TransformProperties) -> DMat4 {
    let translation = DMat4::from_translation(properties.translation);
    let rotation_offset = DMat4::from_translation(properties.rotation_offset);
    let rotation_pivot = DMat4::from_translation(properties.rotation_pivot);
    let scaling_offset = DMat4::from_translation(properties.scaling_offset);
    let scaling_pivot = DMat4::from_translation(properties.scaling_pivot);

    translation
        * rotation_offset
        * rotation_pivot
        * local_rotation(properties)
        * rotation_pivot.inverse()
        * scaling_offset
        * scaling_pivot
        * DMat4::from_scale(properties.scaling)
        * scaling_pivot.inverse()
}

fn local_rotation(properties: &TransformProperties) -> DMat4 {
    math::rotation_matrix(properties.pre_rotation)
        * math::rotation_matrix(properties.rotation)
        * math::rotation_matrix(properties.post_rotation)
}

/// Combine a node's properties with its parent's global matrix.
///
/// `parent_local_scaling` is the parent's own scaling property, only read
/// by [`InheritType::Rrs`].
pub fn compose_global(
    properties: &TransformProperties,
    inherit_type: InheritType,
    parent_global: &DMat4,
    parent_local_scaling: DVec3,
) -> DMat4 {
    let parent_rotation = math::rotation_part(parent_global);
    let parent_translation = DMat4::from_translation(math::translation_part(parent_global));
    // Whatever remains once rotation and translation are removed: scaling and shear.
    let parent_scaling = parent_rotation.inverse() * parent_translation.inverse() * *parent_global;

    let local_rotation = local_rotation(properties);
    let local_scaling = DMat4::from_scale(properties.scaling);

    let rotation_scaling = match inherit_type {
        InheritType::RrSs => parent_rotation * local_rotation * parent_scaling * local_scaling,
        InheritType::RSrs => parent_rotation * parent_scaling * local_rotation * local_scaling,
        InheritType::Rrs => {
            let parent_local_scaling = DMat4::from_scale(parent_local_scaling);
            parent_rotation
                * local_rotation
                * (parent_scaling * parent_local_scaling.inverse())
                * local_scaling
        }
    };

    let local_translation = math::translation_part(&local_full_matrix(properties));
    let global_translation = math::transform_point(parent_global, local_translation);

    DMat4::from_translation(global_translation) * rotation_scaling
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// Evaluation order of a scene, parents always before their children.
#[derive(Debug, Clone)]
pub struct HierarchyComposer {
    order: Vec<NodeId>,
}

impl HierarchyComposer {
    pub fn new(scene: &SceneAsset) -> Result<Self> {
        let count = scene.len();
        for (index, node) in scene.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent.index() >= count {
                    debug!("Node #{} has unknown parent {}", index, parent);
                    return Err(DeformError::UnknownNode(parent));
                }
            }
        }

        let mut visits = vec![Visit::Pending; count];
        let mut order = Vec::with_capacity(count);
        let mut stack = Vec::new();

        for start in 0..count {
            let mut current = Some(NodeId(start));
            while let Some(id) = current {
                match visits[id.index()] {
                    Visit::Done => break,
                    Visit::InProgress => return Err(DeformError::ParentCycle(id)),
                    Visit::Pending => {
                        visits[id.index()] = Visit::InProgress;
                        stack.push(id);
                        current = scene.nodes[id.index()].parent;
                    }
                }
            }
            while let Some(id) = stack.pop() {
                visits[id.index()] = Visit::Done;
                order.push(id);
            }
        }

        trace!("Hierarchy order: {:?}", order);
        Ok(Self { order })
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Global transform of every node of `scene`.
    ///
    /// The scene must have the structure the composer was built from; an
    /// animated copy of it is fine.
    pub fn evaluate(&self, scene: &SceneAsset) -> Result<NodeTransforms> {
        let mut globals = vec![DMat4::IDENTITY; scene.len()];
        let mut parents = vec![None; scene.len()];

        for id in self.order() {
            let node = scene.node(*id).ok_or(DeformError::UnknownNode(*id))?;
            let (parent_global, parent_scaling) = match node.parent {
                Some(parent) => {
                    let parent_node = scene.node(parent).ok_or(DeformError::UnknownNode(parent))?;
                    (globals[parent.index()], parent_node.properties.scaling)
                }
                None => (DMat4::IDENTITY, DVec3::ONE),
            };
            globals[id.index()] = compose_global(
                &node.properties,
                node.inherit_type,
                &parent_global,
                parent_scaling,
            );
            parents[id.index()] = node.parent;
        }

        Ok(NodeTransforms { globals, parents })
    }
}

/// Global transforms of the nodes of one scene at one time.
#[derive(Debug, Clone, Default)]
pub struct NodeTransforms {
    globals: Vec<DMat4>,
    parents: Vec<Option<NodeId>>,
}

impl NodeTransforms {
    pub fn from_scene(scene: &SceneAsset) -> Result<Self> {
        HierarchyComposer::new(scene)?.evaluate(scene)
    }

    pub fn global(&self, id: NodeId) -> Option<DMat4> {
        self.globals.get(id.index()).copied()
    }

    /// Transform relative to the parent's global, the global itself for roots.
    pub fn local(&self, id: NodeId) -> Option<DMat4> {
        let global = self.global(id)?;
        match self.parent(id).and_then(|parent| self.global(parent)) {
            Some(parent_global) => Some(parent_global.inverse() * global),
            None => Some(global),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DMat4)> {
        self.globals
            .iter()
            .enumerate()
            .map(|(index, global)| (NodeId(index), global))
    }
}
