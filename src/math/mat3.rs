use std::ops::{Add, Mul};

use super::quat::Quat;
use super::vec3::Vec3;

/// A 3x3 matrix stored in column-major order.
///
/// Holds rotation matrices and inertia tensors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    /// All entries zero
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO],
    };

    /// Identity matrix
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a matrix from three columns
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Diagonal matrix, e.g. a principal-axis inertia tensor
    #[inline]
    pub fn from_diagonal(diag: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(diag.x, 0.0, 0.0),
            Vec3::new(0.0, diag.y, 0.0),
            Vec3::new(0.0, 0.0, diag.z),
        )
    }

    /// Rotation matrix of a unit quaternion
    #[inline]
    pub fn from_quat(q: Quat) -> Self {
        let [x, y, z] = q.axes();
        Self::from_cols(x, y, z)
    }

    /// Transposed matrix
    #[inline]
    pub fn transpose(self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    /// Determinant as the triple product of the columns
    #[inline]
    pub fn determinant(self) -> f32 {
        self.cols[0].dot(self.cols[1].cross(self.cols[2]))
    }

    /// Inverse via the adjugate, or `None` for a singular matrix
    #[inline]
    pub fn try_inverse(self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;
        // Rows of the inverse are the cofactor cross products
        let r0 = self.cols[1].cross(self.cols[2]) * inv_det;
        let r1 = self.cols[2].cross(self.cols[0]) * inv_det;
        let r2 = self.cols[0].cross(self.cols[1]) * inv_det;

        Some(Self::from_cols(r0, r1, r2).transpose())
    }

    /// Column `index`
    #[inline]
    pub fn col(self, index: usize) -> Vec3 {
        self.cols[index]
    }

    /// Row `index`
    #[inline]
    pub fn row(self, index: usize) -> Vec3 {
        Vec3::new(self.cols[0][index], self.cols[1][index], self.cols[2][index])
    }

    /// Main diagonal as a vector
    #[inline]
    pub fn diagonal(self) -> Vec3 {
        Vec3::new(self.cols[0].x, self.cols[1].y, self.cols[2].z)
    }

    /// Every entry multiplied by `s`
    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::from_cols(self.cols[0] * s, self.cols[1] * s, self.cols[2] * s)
    }

    /// Off-diagonal entries, in (row, col) order: (0,1) (0,2) (1,0) (1,2) (2,0) (2,1)
    #[inline]
    pub fn off_diagonal(self) -> [f32; 6] {
        [
            self.cols[1].x,
            self.cols[2].x,
            self.cols[0].y,
            self.cols[2].y,
            self.cols[0].z,
            self.cols[1].z,
        ]
    }

    /// True when every column is within `epsilon` of the matching column
    #[inline]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (0..3).all(|i| (self.cols[i] - other.cols[i]).length_squared() < epsilon * epsilon)
    }
}

impl Add for Mat3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::from_cols(
            self.cols[0] + other.cols[0],
            self.cols[1] + other.cols[1],
            self.cols[2] + other.cols[2],
        )
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::from_cols(self * other.cols[0], self * other.cols[1], self * other.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, s: f32) -> Self {
        self.scale(s)
    }
}
