use std::fmt::Debug;

use deformer_asset::{
    animation::{
        AnimationAsset, AnimationKeyFrame, AnimationKeyFrames, AnimationSampler, AnimationTarget,
        Interpolate,
    },
    index::ChannelIndex,
    mesh::MeshAsset,
    node::SceneAsset,
};
use glam::DVec3;
use log::{trace, warn};

/// Frames around `time`: progress between them, their time delta and both
/// values. Outside the key range both values are the nearest key.
fn find_keyframe<T: Debug + Clone>(
    time: f64,
    keyframes: &[AnimationKeyFrame<T>],
) -> Option<(f64, f64, &T, &T)> {
    let first = keyframes.first()?;
    if time <= first.time {
        return Some((0.0, 0.0, &first.value, &first.value));
    }
    let next = match keyframes.iter().position(|frame| frame.time > time) {
        Some(next) => next,
        None => {
            let last = keyframes.last()?;
            return Some((0.0, 0.0, &last.value, &last.value));
        }
    };
    let current = &keyframes[next - 1];
    let next = &keyframes[next];
    let delta = next.time - current.time;
    let progress = if delta > 0.0 {
        (time - current.time) / delta
    } else {
        0.0
    };
    Some((progress.clamp(0.0, 1.0), delta, &current.value, &next.value))
}

/// Sample key frames at `time`, mapping stored values before interpolating.
pub fn sample<T: Debug + Clone, I: Interpolate>(
    keyframes: &AnimationKeyFrames<T>,
    time: f64,
    mapper: impl Fn(&T) -> I,
) -> Option<I> {
    match keyframes {
        AnimationKeyFrames::Linear(vec) => {
            find_keyframe(time, vec).map(|(progress, _, current, next)| {
                I::linear(mapper(current), mapper(next), progress)
            })
        }
        AnimationKeyFrames::Step(vec) => {
            find_keyframe(time, vec).map(|(_, _, current, _)| mapper(current))
        }
        AnimationKeyFrames::CubicSpline(vec) => {
            find_keyframe(time, vec).map(|(progress, delta, current, next)| {
                let (value_current, out_current) = (mapper(&current.1), mapper(&current.2));
                let (in_next, value_next) = (mapper(&next.0), mapper(&next.1));
                I::cubic_spline(value_current, out_current, value_next, in_next, progress, delta)
            })
        }
    }
}

fn sample_vec3(keyframes: &AnimationKeyFrames<[f64; 3]>, time: f64) -> Option<DVec3> {
    sample(keyframes, time, |value| DVec3::from_array(*value))
}

/// Copy of `scene` with the node properties driven by `animation` set to
/// their value at `time`.
pub fn apply_animation(scene: &SceneAsset, animation: &AnimationAsset, time: f64) -> SceneAsset {
    let mut scene = scene.clone();
    trace!("Animate {:?} at {:#.03}s", animation.name, time);

    for channel in &animation.channels {
        let id = match channel.target {
            AnimationTarget::Node(id) => id,
            AnimationTarget::Channel(_) => continue,
        };
        let node = match scene.node_mut(id) {
            Some(node) => node,
            None => {
                warn!("Target node to be animated not found: {}", id);
                continue;
            }
        };
        let properties = &mut node.properties;
        match &channel.sampler {
            AnimationSampler::Translation(keyframes) => {
                if let Some(translation) = sample_vec3(keyframes, time) {
                    properties.translation = translation;
                }
            }
            AnimationSampler::Rotation(keyframes) => {
                if let Some(rotation) = sample_vec3(keyframes, time) {
                    properties.rotation = rotation;
                }
            }
            AnimationSampler::Scaling(keyframes) => {
                if let Some(scaling) = sample_vec3(keyframes, time) {
                    properties.scaling = scaling;
                }
            }
            AnimationSampler::ChannelWeight(_) => {
                warn!("Channel weight curve bound to node {}", id);
            }
        }
    }
    scene
}

/// Apply several animations in order; later ones win on shared targets.
pub fn apply_animations(scene: &SceneAsset, animations: &[AnimationAsset], time: f64) -> SceneAsset {
    animations
        .iter()
        .fold(scene.clone(), |scene, animation| {
            apply_animation(&scene, animation, time)
        })
}

pub fn sample_channel_weight(
    animation: &AnimationAsset,
    index: ChannelIndex,
    time: f64,
) -> Option<f64> {
    animation
        .channels
        .iter()
        .filter(|channel| channel.target == AnimationTarget::Channel(index))
        .find_map(|channel| match &channel.sampler {
            AnimationSampler::ChannelWeight(keyframes) => sample(keyframes, time, |value| *value),
            _ => None,
        })
}

/// Weights of every blend-shape channel of a mesh at `time`, in
/// declaration order.
pub fn channel_weights(
    mesh_index: usize,
    mesh: &MeshAsset,
    animations: &[AnimationAsset],
    time: f64,
) -> Vec<f64> {
    let mut weights = Vec::new();
    for (blend_shape_index, blend_shape) in mesh.blend_shapes.iter().enumerate() {
        for (channel_index, channel) in blend_shape.channels.iter().enumerate() {
            let index = ChannelIndex {
                mesh: mesh_index,
                blend_shape: blend_shape_index,
                channel: channel_index,
            };
            weights.push(crate::blend_shape::channel_weight(
                index, channel, animations, time,
            ));
        }
    }
    weights
}

#[cfg(test)]
mod test {
    use deformer_asset::{
        animation::{
            AnimationAsset, AnimationChannelAsset, AnimationKeyFrame, AnimationKeyFrames,
            AnimationSampler, AnimationTarget,
        },
        blend_shape::{BlendShapeAsset, BlendShapeChannel},
        index::{ChannelIndex, NodeId},
        mesh::MeshAsset,
        node::{NodeAsset, SceneAsset},
    };
    use glam::DVec3;

    use super::*;

    fn frames<T: std::fmt::Debug + Clone>(values: &[(f64, T)]) -> Vec<AnimationKeyFrame<T>> {
        values
            .iter()
            .map(|(time, value)| AnimationKeyFrame {
                time: *time,
                value: value.clone(),
            })
            .collect()
    }

    #[test]
    fn test_sample_linear_and_step() {
        let keys = frames(&[(1.0, 10.0), (3.0, 20.0)]);
        let linear = AnimationKeyFrames::Linear(keys.clone());
        let step = AnimationKeyFrames::Step(keys);

        assert_eq!(sample(&linear, 0.0, |v| *v), Some(10.0));
        assert_eq!(sample(&linear, 2.0, |v| *v), Some(15.0));
        assert_eq!(sample(&linear, 9.0, |v| *v), Some(20.0));
        assert_eq!(sample(&step, 2.9, |v| *v), Some(10.0));
        assert_eq!(sample(&step, 3.0, |v| *v), Some(20.0));

        let empty = AnimationKeyFrames::<f64>::Linear(Vec::new());
        assert_eq!(sample(&empty, 1.0, |v| *v), None);
    }

    #[test]
    fn test_sample_cubic_spline_hits_keys() {
        let keys = AnimationKeyFrames::CubicSpline(frames(&[
            (0.0, (0.0, 1.0, 4.0)),
            (2.0, (-3.0, 5.0, 0.0)),
        ]));
        assert_eq!(sample(&keys, 0.0, |v| *v), Some(1.0));
        assert_eq!(sample(&keys, 2.0, |v| *v), Some(5.0));
        let middle = sample(&keys, 1.0, |v| *v).unwrap();
        // Hermite midpoint: (p0 + p1) / 2 + delta * (m0 - m1) / 8.
        assert!((middle - (3.0 + 2.0 * (4.0 + 3.0) / 8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_apply_animation() {
        let mut scene = SceneAsset::default();
        let joint = scene.add_node(NodeAsset::new("joint", None));
        let animation = AnimationAsset {
            name: Some(String::from("bend")),
            channels: vec![
                AnimationChannelAsset {
                    sampler: AnimationSampler::Rotation(AnimationKeyFrames::Linear(frames(&[
                        (0.0, [0.0, 0.0, 0.0]),
                        (1.0, [0.0, 90.0, 0.0]),
                    ]))),
                    target: AnimationTarget::Node(joint),
                },
                AnimationChannelAsset {
                    sampler: AnimationSampler::Translation(AnimationKeyFrames::Step(frames(&[(
                        0.0,
                        [1.0, 2.0, 3.0],
                    )]))),
                    target: AnimationTarget::Node(NodeId(4)),
                },
            ],
        };

        let animated = apply_animation(&scene, &animation, 0.5);
        assert!(animated.nodes[0]
            .properties
            .rotation
            .abs_diff_eq(DVec3::new(0.0, 45.0, 0.0), 1e-12));
        // Source scene untouched.
        assert_eq!(scene.nodes[0].properties.rotation, DVec3::ZERO);
    }

    #[test]
    fn test_channel_weights() {
        let mesh = MeshAsset {
            blend_shapes: vec![BlendShapeAsset {
                name: None,
                channels: vec![
                    BlendShapeChannel {
                        deform_percent: 10.0,
                        ..Default::default()
                    },
                    BlendShapeChannel {
                        deform_percent: 20.0,
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };
        let animation = AnimationAsset {
            name: None,
            channels: vec![AnimationChannelAsset {
                sampler: AnimationSampler::ChannelWeight(AnimationKeyFrames::Step(frames(&[(
                    0.0, 75.0,
                )]))),
                target: AnimationTarget::Channel(ChannelIndex {
                    mesh: 3,
                    blend_shape: 0,
                    channel: 1,
                }),
            }],
        };
        assert_eq!(
            channel_weights(3, &mesh, &[animation.clone()], 1.0),
            vec![10.0, 75.0]
        );
        assert_eq!(channel_weights(0, &mesh, &[animation], 1.0), vec![10.0, 20.0]);
    }
}
