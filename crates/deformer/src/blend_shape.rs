//! Blend-shape interpolation.
//!
//! A channel holds target shapes reached at increasing full weights. A
//! channel weight picks the two shapes around it (the base shape below the
//! first threshold) and interpolates linearly between them.

use deformer_asset::{
    animation::AnimationAsset,
    blend_shape::{BlendShapeAsset, BlendShapeChannel},
    index::ChannelIndex,
};
use glam::DVec3;
use log::{trace, warn};

use crate::animation;

/// Pair of shapes around a channel weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSegment {
    /// Start target, `None` for the base shape.
    pub start: Option<usize>,
    pub end: usize,
    /// Progress from start to end, 0 to 100.
    pub weight: f64,
}

/// Find the shapes to interpolate for `weight` given the ordered full
/// weights of the targets.
///
/// Weights above the last threshold reach the last target when `clamp` is
/// set and match nothing otherwise.
pub fn find_segment(weight: f64, full_weights: &[f64], clamp: bool) -> Option<ShapeSegment> {
    let first = *full_weights.first()?;
    if weight <= 0.0 {
        return None;
    }
    if weight <= first {
        return Some(ShapeSegment {
            start: None,
            end: 0,
            weight: weight / first * 100.0,
        });
    }

    for (index, pair) in full_weights.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        if start < weight && weight <= end {
            return Some(ShapeSegment {
                start: Some(index),
                end: index + 1,
                weight: (weight - start) / (end - start) * 100.0,
            });
        }
    }

    let last = full_weights.len() - 1;
    if clamp && weight > full_weights[last] {
        return Some(ShapeSegment {
            start: Some(last),
            end: last,
            weight: 100.0,
        });
    }
    None
}

/// Deform `base` by one channel, `None` when the weight selects no shape or
/// a selected shape does not match the base point count.
pub fn deform_channel(
    base: &[DVec3],
    channel: &BlendShapeChannel,
    weight: f64,
    clamp: bool,
) -> Option<Vec<DVec3>> {
    let segment = find_segment(weight, &channel.full_weights(), clamp)?;
    trace!(
        "Channel {:?} at {}: {:?}",
        channel.name,
        weight,
        segment
    );

    let start = match segment.start {
        Some(index) => target_points(channel, index, base.len())?,
        None => base,
    };
    let end = target_points(channel, segment.end, base.len())?;

    let progress = segment.weight * 0.01;
    Some(
        start
            .iter()
            .zip(end)
            .map(|(start, end)| *start + (*end - *start) * progress)
            .collect(),
    )
}

fn target_points(channel: &BlendShapeChannel, index: usize, count: usize) -> Option<&[DVec3]> {
    let points = &channel.targets.get(index)?.control_points;
    if points.len() != count {
        warn!(
            "Target shape {} of channel {:?} has {} points, expected {}",
            index,
            channel.name,
            points.len(),
            count
        );
        return None;
    }
    Some(points)
}

/// Apply every channel in declaration order.
///
/// `weights` lists one weight per channel across all blend shapes;
/// missing entries fall back to the channel's deform percent. Each matched
/// channel replaces the output computed so far.
pub fn deform(
    base: &[DVec3],
    blend_shapes: &[BlendShapeAsset],
    weights: &[f64],
    clamp: bool,
) -> Vec<DVec3> {
    let mut output = base.to_vec();
    let channels = blend_shapes
        .iter()
        .flat_map(|blend_shape| blend_shape.channels.iter());
    for (index, channel) in channels.enumerate() {
        let weight = weights
            .get(index)
            .copied()
            .unwrap_or(channel.deform_percent);
        if let Some(deformed) = deform_channel(base, channel, weight, clamp) {
            output = deformed;
        }
    }
    output
}

/// Weight of a channel at `time`: the first animation curve driving it, or
/// its deform percent.
pub fn channel_weight(
    index: ChannelIndex,
    channel: &BlendShapeChannel,
    animations: &[AnimationAsset],
    time: f64,
) -> f64 {
    animations
        .iter()
        .find_map(|animation| animation::sample_channel_weight(animation, index, time))
        .unwrap_or(channel.deform_percent)
}

#[cfg(test)]
mod test {
    use deformer_asset::{
        animation::{
            AnimationAsset, AnimationChannelAsset, AnimationKeyFrame, AnimationKeyFrames,
            AnimationSampler, AnimationTarget,
        },
        blend_shape::{BlendShapeAsset, BlendShapeChannel, TargetShape},
        index::ChannelIndex,
    };
    use glam::DVec3;

    use super::*;

    fn target(full_weight: f64, x: f64) -> TargetShape {
        TargetShape {
            name: None,
            full_weight,
            control_points: vec![DVec3::new(x, 0.0, 0.0), DVec3::new(x, 1.0, 0.0)],
        }
    }

    fn channel(targets: Vec<TargetShape>) -> BlendShapeChannel {
        BlendShapeChannel {
            name: Some(String::from("smile")),
            deform_percent: 0.0,
            targets,
        }
    }

    fn base() -> Vec<DVec3> {
        vec![DVec3::ZERO, DVec3::Y]
    }

    #[test]
    fn test_find_segment() {
        let full_weights = [50.0, 100.0];
        assert_eq!(find_segment(0.0, &full_weights, true), None);
        assert_eq!(find_segment(-5.0, &full_weights, true), None);
        assert_eq!(
            find_segment(25.0, &full_weights, true),
            Some(ShapeSegment {
                start: None,
                end: 0,
                weight: 50.0
            })
        );
        assert_eq!(
            find_segment(75.0, &full_weights, true),
            Some(ShapeSegment {
                start: Some(0),
                end: 1,
                weight: 50.0
            })
        );
        assert_eq!(
            find_segment(150.0, &full_weights, true),
            Some(ShapeSegment {
                start: Some(1),
                end: 1,
                weight: 100.0
            })
        );
        assert_eq!(find_segment(150.0, &full_weights, false), None);
        assert_eq!(find_segment(10.0, &[], true), None);
    }

    #[test]
    fn test_zero_weight_keeps_base() {
        let channel = channel(vec![target(100.0, 4.0)]);
        assert_eq!(deform_channel(&base(), &channel, 0.0, true), None);
        let blend_shapes = [BlendShapeAsset {
            name: None,
            channels: vec![channel],
        }];
        assert_eq!(deform(&base(), &blend_shapes, &[0.0], true), base());
    }

    #[test]
    fn test_weight_at_threshold_reaches_target() {
        let channel = channel(vec![target(50.0, 2.0), target(100.0, 6.0)]);
        let deformed = deform_channel(&base(), &channel, 50.0, true).unwrap();
        assert_eq!(deformed, channel.targets[0].control_points);

        let deformed = deform_channel(&base(), &channel, 75.0, true).unwrap();
        assert!(deformed[0].abs_diff_eq(DVec3::new(4.0, 0.0, 0.0), 1e-12));
        assert!(deformed[1].abs_diff_eq(DVec3::new(4.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_equal_thresholds() {
        let channel = channel(vec![target(50.0, 2.0), target(50.0, 6.0), target(100.0, 8.0)]);
        for weight in [25.0, 50.0, 60.0, 100.0] {
            let deformed = deform_channel(&base(), &channel, weight, true).unwrap();
            assert!(deformed.iter().all(|point| point.is_finite()));
        }
        // The duplicated threshold never starts a segment.
        let deformed = deform_channel(&base(), &channel, 75.0, true).unwrap();
        assert!(deformed[0].abs_diff_eq(DVec3::new(7.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_channels_in_order() {
        let first = channel(vec![target(100.0, 2.0)]);
        let second = channel(vec![target(100.0, 10.0)]);
        let blend_shapes = [BlendShapeAsset {
            name: None,
            channels: vec![first, second],
        }];
        // The last matched channel wins.
        let deformed = deform(&base(), &blend_shapes, &[100.0, 50.0], true);
        assert!(deformed[0].abs_diff_eq(DVec3::new(5.0, 0.0, 0.0), 1e-12));

        let deformed = deform(&base(), &blend_shapes, &[100.0, 0.0], true);
        assert!(deformed[0].abs_diff_eq(DVec3::new(2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_mismatched_target_skipped() {
        let mut channel = channel(vec![target(100.0, 2.0)]);
        channel.targets[0].control_points.pop();
        assert_eq!(deform_channel(&base(), &channel, 100.0, true), None);
    }

    #[test]
    fn test_channel_weight() {
        let index = ChannelIndex {
            mesh: 0,
            blend_shape: 0,
            channel: 0,
        };
        let mut channel = channel(vec![target(100.0, 2.0)]);
        channel.deform_percent = 30.0;
        assert_eq!(channel_weight(index, &channel, &[], 1.0), 30.0);

        let animation = AnimationAsset {
            name: None,
            channels: vec![AnimationChannelAsset {
                sampler: AnimationSampler::ChannelWeight(AnimationKeyFrames::Linear(vec![
                    AnimationKeyFrame {
                        time: 0.0,
                        value: 0.0,
                    },
                    AnimationKeyFrame {
                        time: 2.0,
                        value: 100.0,
                    },
                ])),
                target: AnimationTarget::Channel(index),
            }],
        };
        assert_eq!(channel_weight(index, &channel, &[animation], 1.0), 50.0);
    }
}
