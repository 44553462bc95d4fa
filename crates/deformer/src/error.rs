use std::fmt::{self, Display, Formatter};

use deformer_asset::{index::NodeId, skin::LinkMode};

#[derive(Debug, Clone, PartialEq)]
pub enum DeformError {
    MixedLinkModes {
        cluster: usize,
        expected: LinkMode,
        actual: LinkMode,
    },
    EmptySkin,
    WeightCountMismatch {
        cluster: usize,
        indices: usize,
        weights: usize,
    },
    UnknownNode(NodeId),
    ParentCycle(NodeId),
    BadParams(String),
}

impl Display for DeformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeformError::MixedLinkModes {
                cluster,
                expected,
                actual,
            } => write!(
                f,
                "Cluster {} uses link mode {:?}, but the skin uses {:?}",
                cluster, actual, expected
            ),
            DeformError::EmptySkin => write!(f, "Skin has no cluster"),
            DeformError::WeightCountMismatch {
                cluster,
                indices,
                weights,
            } => write!(
                f,
                "Cluster {} has {} control point indices but {} weights",
                cluster, indices, weights
            ),
            DeformError::UnknownNode(node) => write!(f, "Unknown node {}", node),
            DeformError::ParentCycle(node) => {
                write!(f, "Node {} is part of a parent cycle", node)
            }
            DeformError::BadParams(message) => write!(f, "Bad evaluation params: {}", message),
        }
    }
}

impl std::error::Error for DeformError {}
