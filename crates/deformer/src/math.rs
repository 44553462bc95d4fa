//! Matrix helpers shared by the evaluators.
//!
//! Matrices are column major and multiply column vectors, so `a * b`
//! applies `b` first.

use deformer_asset::node::TransformProperties;
use glam::{DMat4, DQuat, DVec3, DVec4};

/// Multiply every element of the matrix.
#[inline]
pub fn scale_matrix(matrix: &mut DMat4, value: f64) {
    *matrix = *matrix * value;
}

/// Add the value to the four diagonal elements.
#[inline]
pub fn add_to_diagonal(matrix: &mut DMat4, value: f64) {
    *matrix = *matrix + DMat4::from_diagonal(DVec4::splat(value));
}

#[inline]
pub fn add_matrix(destination: &mut DMat4, source: &DMat4) {
    *destination = *destination + *source;
}

/// Apply the full 4x4 matrix to a point with `w = 1`.
///
/// Accumulated skinning matrices are not always affine, so the bottom row
/// is evaluated too and only `x, y, z` are kept.
#[inline]
pub fn transform_point(matrix: &DMat4, point: DVec3) -> DVec3 {
    (*matrix * point.extend(1.0)).truncate()
}

/// Rotation matrix for Euler angles in degrees, X applied first.
pub fn rotation_matrix(euler_degrees: DVec3) -> DMat4 {
    DMat4::from_rotation_z(euler_degrees.z.to_radians())
        * DMat4::from_rotation_y(euler_degrees.y.to_radians())
        * DMat4::from_rotation_x(euler_degrees.x.to_radians())
}

#[inline]
pub fn translation_part(matrix: &DMat4) -> DVec3 {
    matrix.w_axis.truncate()
}

/// Rotation of an affine matrix with scaling and shear removed.
pub fn rotation_quat(matrix: &DMat4) -> DQuat {
    let (_, rotation, _) = matrix.to_scale_rotation_translation();
    rotation.normalize()
}

pub fn rotation_part(matrix: &DMat4) -> DMat4 {
    DMat4::from_quat(rotation_quat(matrix))
}

/// Offset applied to the geometry attached to a node.
pub fn geometry_matrix(properties: &TransformProperties) -> DMat4 {
    DMat4::from_translation(properties.geometric_translation)
        * rotation_matrix(properties.geometric_rotation)
        * DMat4::from_scale(properties.geometric_scaling)
}
