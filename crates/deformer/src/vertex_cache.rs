use glam::DVec3;
use log::warn;

/// Overwrite `points` with a baked frame of flat `x, y, z` values.
///
/// Returns false and leaves the points alone when the frame does not hold
/// exactly one position per point.
pub fn apply_vertex_cache(points: &mut [DVec3], frame: &[f32]) -> bool {
    if frame.len() != points.len() * 3 {
        warn!(
            "Vertex cache frame has {} values for {} control points",
            frame.len(),
            points.len()
        );
        return false;
    }
    for (point, values) in points.iter_mut().zip(frame.chunks_exact(3)) {
        *point = DVec3::new(values[0] as f64, values[1] as f64, values[2] as f64);
    }
    true
}
