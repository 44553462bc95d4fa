use std::{
    fmt::Debug,
    ops::{Add, Mul},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::{ChannelIndex, NodeId};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationKeyFrame<T: Debug + Clone> {
    /// Seconds.
    pub time: f64,
    pub value: T,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnimationKeyFrames<T: Debug + Clone> {
    Linear(Vec<AnimationKeyFrame<T>>),
    Step(Vec<AnimationKeyFrame<T>>),
    // in, val, out
    CubicSpline(Vec<AnimationKeyFrame<(T, T, T)>>),
}

/// Animated value. Node properties are Euler degrees or scale factors,
/// channel weights use the 0 to 100 scale.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnimationSampler {
    Translation(AnimationKeyFrames<[f64; 3]>),
    Rotation(AnimationKeyFrames<[f64; 3]>),
    Scaling(AnimationKeyFrames<[f64; 3]>),
    ChannelWeight(AnimationKeyFrames<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnimationTarget {
    Node(NodeId),
    Channel(ChannelIndex),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationChannelAsset {
    pub sampler: AnimationSampler,
    pub target: AnimationTarget,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AnimationAsset {
    pub name: Option<String>,
    pub channels: Vec<AnimationChannelAsset>,
}

pub trait Interpolate {
    fn linear(a: Self, b: Self, t: f64) -> Self;
    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f64, td: f64) -> Self;
}

impl<T> Interpolate for T
where
    T: Mul<f64, Output = T> + Add<T, Output = T>,
{
    fn linear(a: Self, b: Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }

    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f64, td: f64) -> Self {
        let t3 = t.powi(3);
        let t2 = t.powi(2);
        let first = vk * (2.0 * t3 - 3.0 * t2 + 1.0);
        let second = bk * (td * (t3 - 2.0 * t2 + t));
        let third = vk_1 * (-2.0 * t3 + 3.0 * t2);
        let forth = ak_1 * (td * (t3 - t2));
        first + second + third + forth
    }
}
