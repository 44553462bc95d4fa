use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::{DMat4, DQuat, DVec3};

use crate::math;

/// Rigid transform stored as a rotation quaternion and a dual part
/// encoding the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualQuat {
    real: DQuat,
    dual: DQuat,
}

const ZERO_QUAT: DQuat = DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0);

impl Default for DualQuat {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DualQuat {
    /// Accumulator start value, not a valid transform.
    pub const ZERO: Self = Self {
        real: ZERO_QUAT,
        dual: ZERO_QUAT,
    };

    pub fn from_rotation_translation(rotation: DQuat, translation: DVec3) -> Self {
        let translation = DQuat::from_xyzw(translation.x, translation.y, translation.z, 0.0);
        Self {
            real: rotation,
            dual: translation * rotation * 0.5,
        }
    }

    /// Scaling and shear of the matrix are dropped.
    pub fn from_matrix(matrix: &DMat4) -> Self {
        Self::from_rotation_translation(math::rotation_quat(matrix), math::translation_part(matrix))
    }

    /// Dot product of the rotation parts, negative when they lie in
    /// opposite hemispheres.
    pub fn dot_real(&self, other: &Self) -> f64 {
        self.real.dot(other.real)
    }

    fn translation(&self) -> DVec3 {
        let translation = self.dual * self.real.conjugate() * 2.0;
        DVec3::new(translation.x, translation.y, translation.z)
    }

    /// Divide both parts by the length of the rotation part.
    pub fn normalize(&self) -> Self {
        let length = self.real.length();
        if length <= f64::EPSILON {
            return *self;
        }
        let inverse = 1.0 / length;
        Self {
            real: self.real * inverse,
            dual: self.dual * inverse,
        }
    }

    /// Apply the transform to a point. Expects a normalized value.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.real.mul_vec3(point) + self.translation()
    }
}

impl Add for DualQuat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            real: self.real + rhs.real,
            dual: self.dual + rhs.dual,
        }
    }
}

impl Sub for DualQuat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            real: self.real - rhs.real,
            dual: self.dual - rhs.dual,
        }
    }
}

impl Neg for DualQuat {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            real: -self.real,
            dual: -self.dual,
        }
    }
}

impl Mul<f64> for DualQuat {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            real: self.real * rhs,
            dual: self.dual * rhs,
        }
    }
}

impl AddAssign for DualQuat {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DualQuat {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
