use crate::math::consts::CONTAINMENT_TOLERANCE;
use crate::math::Vec3;

/// World-space axis-aligned bounds defined by minimum and maximum corners.
///
/// Used by the AABB narrow-phase test and for debug drawing of every shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |acc, &p| {
            Self::new(acc.min.min(p), acc.max.max(p))
        }))
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Signed overlap along one world axis (0 = x, 1 = y, 2 = z).
    /// Positive when the projections overlap.
    #[inline]
    pub fn overlap_on_axis(self, other: Self, axis: usize) -> f32 {
        self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis])
    }

    /// Overlap on all three axes
    #[inline]
    pub fn overlaps(self, other: Self) -> Vec3 {
        Vec3::new(
            self.overlap_on_axis(other, 0),
            self.overlap_on_axis(other, 1),
            self.overlap_on_axis(other, 2),
        )
    }

    /// Region shared by both boxes. Only meaningful when they overlap.
    #[inline]
    pub fn intersection(self, other: Self) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Closed containment test with [`CONTAINMENT_TOLERANCE`] slack
    #[inline]
    pub fn contains_point(self, point: Vec3) -> bool {
        (0..3).all(|i| {
            point[i] >= self.min[i] - CONTAINMENT_TOLERANCE
                && point[i] <= self.max[i] + CONTAINMENT_TOLERANCE
        })
    }

    #[inline]
    pub fn closest_point(self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    #[inline]
    pub fn corners(self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}
