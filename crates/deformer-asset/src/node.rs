use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

/// How a node combines its rotation and scaling with the parent's.
///
/// Names follow the usual `R`/`S` shorthand: upper case is the parent's
/// global term, lower case the node's local term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InheritType {
    /// Parent scaling applies after the local rotation.
    #[default]
    RrSs,
    /// Parent scaling applies before the local rotation.
    RSrs,
    /// Only the parent's rotation is inherited, its own local scaling is removed.
    Rrs,
}

/// Local transform properties of a node.
///
/// Rotations are Euler angles in degrees, applied X first, then Y, then Z.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TransformProperties {
    pub translation: DVec3,
    pub rotation: DVec3,
    pub pre_rotation: DVec3,
    pub post_rotation: DVec3,
    pub scaling: DVec3,
    pub rotation_offset: DVec3,
    pub rotation_pivot: DVec3,
    pub scaling_offset: DVec3,
    pub scaling_pivot: DVec3,
    // Offsets applied to attached geometry only, never inherited by children.
    pub geometric_translation: DVec3,
    pub geometric_rotation: DVec3,
    pub geometric_scaling: DVec3,
}

impl Default for TransformProperties {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            pre_rotation: DVec3::ZERO,
            post_rotation: DVec3::ZERO,
            scaling: DVec3::ONE,
            rotation_offset: DVec3::ZERO,
            rotation_pivot: DVec3::ZERO,
            scaling_offset: DVec3::ZERO,
            scaling_pivot: DVec3::ZERO,
            geometric_translation: DVec3::ZERO,
            geometric_rotation: DVec3::ZERO,
            geometric_scaling: DVec3::ONE,
        }
    }
}

impl TransformProperties {
    pub fn from_trs(translation: DVec3, rotation: DVec3, scaling: DVec3) -> Self {
        Self {
            translation,
            rotation,
            scaling,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NodeAsset {
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub properties: TransformProperties,
    pub inherit_type: InheritType,
}

impl NodeAsset {
    pub fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: Some(name.into()),
            parent,
            ..Default::default()
        }
    }

    pub fn with_properties(mut self, properties: TransformProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_inherit_type(mut self, inherit_type: InheritType) -> Self {
        self.inherit_type = inherit_type;
        self
    }
}

/// Flat node list; a node refers to its parent by index.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SceneAsset {
    pub name: Option<String>,
    pub nodes: Vec<NodeAsset>,
}

impl SceneAsset {
    pub fn add_node(&mut self, node: NodeAsset) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeAsset> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeAsset> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
