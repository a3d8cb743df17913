use super::mat3::Mat3;
use super::quat::Quat;
use super::vec3::Vec3;

/// World placement of a body or collider: a position and a unit orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    /// Origin with no rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Creates a pose from a position and orientation
    #[inline]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose with the given position and no rotation
    #[inline]
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Local point to world space
    #[inline]
    pub fn transform_point(self, point: Vec3) -> Vec3 {
        self.orientation.rotate_vec(point) + self.position
    }

    /// World point to local space
    #[inline]
    pub fn inverse_transform_point(self, point: Vec3) -> Vec3 {
        self.orientation.inverse_rotate_vec(point - self.position)
    }

    /// Orientation as a rotation matrix
    #[inline]
    pub fn rotation_matrix(self) -> Mat3 {
        Mat3::from_quat(self.orientation)
    }

    /// The local box axes in world space
    #[inline]
    pub fn axes(self) -> [Vec3; 3] {
        self.orientation.axes()
    }
}
