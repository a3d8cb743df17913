use std::ops::{Add, Mul, Neg};

use super::vec3::Vec3;

/// A quaternion stored as (x, y, z, w) with `w` the scalar part.
///
/// Orientations are unit quaternions. The non-unit operations (`Add`, scalar
/// `Mul`) exist so the integrator can form weighted derivative sums before
/// renormalizing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// No rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components, without normalizing
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// The pure quaternion `(v, 0)`
    #[inline]
    pub const fn from_pure(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Rotation of `angle` radians about `axis`
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let axis = axis.normalize();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Squared norm
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Norm; 1 for a rotation
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit quaternion. A degenerate (near-zero) input becomes
    /// the identity rather than NaN.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 1e-10 && len.is_finite() {
            self * (1.0 / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate; the inverse rotation for a unit quaternion
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Four-component dot product
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates `v` by this (unit) quaternion
    #[inline]
    pub fn rotate_vec(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Rotates `v` by the inverse rotation
    #[inline]
    pub fn inverse_rotate_vec(self, v: Vec3) -> Vec3 {
        self.conjugate().rotate_vec(v)
    }

    /// The rotated basis vectors (local X, Y, Z expressed in world space)
    #[inline]
    pub fn axes(self) -> [Vec3; 3] {
        [
            self.rotate_vec(Vec3::X),
            self.rotate_vec(Vec3::Y),
            self.rotate_vec(Vec3::Z),
        ]
    }

    /// True when no component is NaN or infinite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Hamilton product
    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::new(
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        )
    }
}

impl Mul<f32> for Quat {
    type Output = Self;

    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Quat {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Neg for Quat {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
