use glam::DVec3;

use crate::BlendFallback;

/// Mix linear and dual quaternion results per point.
///
/// A blend weight of 1 keeps the dual quaternion result. Points past the end
/// of `blend_weights` follow `fallback`.
pub fn combine(
    points: &[DVec3],
    linear: &[DVec3],
    dual_quaternion: &[DVec3],
    blend_weights: &[f64],
    fallback: BlendFallback,
) -> Vec<DVec3> {
    points
        .iter()
        .zip(linear.iter().zip(dual_quaternion))
        .enumerate()
        .map(|(index, (point, (linear, dual_quaternion)))| {
            let weight = match (blend_weights.get(index), fallback) {
                (Some(weight), _) => *weight,
                (None, BlendFallback::Linear) => 0.0,
                (None, BlendFallback::DualQuaternion) => 1.0,
                (None, BlendFallback::Bind) => return *point,
                (None, BlendFallback::Fixed(weight)) => weight,
            };
            *dual_quaternion * weight + *linear * (1.0 - weight)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use glam::DVec3;

    use super::combine;
    use crate::BlendFallback;

    #[test]
    fn test_combine() {
        let points = [DVec3::ZERO; 3];
        let linear = [DVec3::X; 3];
        let dual_quaternion = [DVec3::Y; 3];

        let blended = combine(&points, &linear, &dual_quaternion, &[0.0, 0.25], BlendFallback::Linear);
        assert_eq!(blended[0], DVec3::X);
        assert_eq!(blended[1], DVec3::new(0.75, 0.25, 0.0));
        assert_eq!(blended[2], DVec3::X);

        let fallbacks = [
            (BlendFallback::DualQuaternion, DVec3::Y),
            (BlendFallback::Bind, DVec3::ZERO),
            (BlendFallback::Fixed(0.5), DVec3::new(0.5, 0.5, 0.0)),
        ];
        for (fallback, expected) in fallbacks {
            let blended = combine(&points, &linear, &dual_quaternion, &[], fallback);
            assert_eq!(blended, vec![expected; 3]);
        }
    }
}
