use glam::DMat4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PoseKind {
    #[default]
    Bind,
    Rest,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseEntry {
    pub node: NodeId,
    pub matrix: DMat4,
    /// Matrix is relative to the parent's global position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub local: bool,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PoseAsset {
    pub name: Option<String>,
    pub kind: PoseKind,
    pub entries: Vec<PoseEntry>,
}

impl PoseAsset {
    pub fn entry(&self, node: NodeId) -> Option<&PoseEntry> {
        self.entries.iter().find(|entry| entry.node == node)
    }
}
