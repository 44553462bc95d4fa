use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{blend_shape::BlendShapeAsset, index::NodeId, skin::SkinAsset};

/// Baked point positions, one flat `x, y, z` buffer per sampled time.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VertexCacheAsset {
    pub times: Vec<f64>,
    pub frames: Vec<Vec<f32>>,
}

impl VertexCacheAsset {
    /// Latest frame sampled at or before `time`, or the first frame.
    pub fn frame_at(&self, time: f64) -> Option<&[f32]> {
        let index = self
            .times
            .iter()
            .rposition(|frame_time| *frame_time <= time)
            .unwrap_or(0);
        self.frames.get(index).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MeshAsset {
    pub name: Option<String>,
    pub node: NodeId,
    pub control_points: Vec<DVec3>,
    pub skins: Vec<SkinAsset>,
    pub blend_shapes: Vec<BlendShapeAsset>,
    pub vertex_cache: Option<VertexCacheAsset>,
}

impl MeshAsset {
    pub fn vertex_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn has_clusters(&self) -> bool {
        self.skins.iter().any(|skin| !skin.clusters.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::VertexCacheAsset;

    #[test]
    fn test_frame_at() {
        let cache = VertexCacheAsset {
            times: vec![0.0, 1.0, 2.0],
            frames: vec![vec![0.0; 3], vec![1.0; 3], vec![2.0; 3]],
        };
        assert_eq!(cache.frame_at(-1.0), Some(&[0.0f32; 3][..]));
        assert_eq!(cache.frame_at(1.5), Some(&[1.0f32; 3][..]));
        assert_eq!(cache.frame_at(9.0), Some(&[2.0f32; 3][..]));
        assert_eq!(VertexCacheAsset::default().frame_at(0.0), None);
    }
}
