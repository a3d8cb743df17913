use crate::collision::CollisionManifold;
use crate::geometry::box_corners;
use crate::math::consts::{CONTAINMENT_TOLERANCE, SAT_AXIS_EPSILON};
use crate::math::{Pose, Vec3};

/// A box in world space: centre, unit axes and half-extents along them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFrame {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub half_extents: Vec3,
}

impl BoxFrame {
    pub fn new(pose: Pose, half_extents: Vec3) -> Self {
        Self {
            center: pose.position,
            axes: pose.axes(),
            half_extents,
        }
    }

    /// Half-length of the box's shadow on `axis`: `Σ eᵢ·|axis·uᵢ|`
    #[inline]
    pub fn projected_radius(&self, axis: Vec3) -> f32 {
        (0..3)
            .map(|i| self.half_extents[i] * axis.dot(self.axes[i]).abs())
            .sum()
    }

    /// Min and max of the corners projected on `axis`
    fn projected_interval(&self, axis: Vec3) -> (f32, f32) {
        let c = self.center.dot(axis);
        let r = self.projected_radius(axis);
        (c - r, c + r)
    }

    /// Closed containment in the box's own frame, with tolerance
    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = point - self.center;
        (0..3).all(|i| d.dot(self.axes[i]).abs() <= self.half_extents[i] + CONTAINMENT_TOLERANCE)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        // Signed local corners, then mapped onto the world axes
        box_corners(self.half_extents, Pose::IDENTITY).map(|local| {
            self.center + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
        })
    }
}

/// The 15 SAT candidates: 3 face axes of each box, then the 9 edge cross
/// products. Cross products of (nearly) parallel edges are dropped.
fn candidate_axes(a: &BoxFrame, b: &BoxFrame) -> Vec<Vec3> {
    let mut axes = Vec::with_capacity(15);
    axes.extend_from_slice(&a.axes);
    axes.extend_from_slice(&b.axes);
    for ua in &a.axes {
        for ub in &b.axes {
            let cross = ua.cross(*ub);
            let len = cross.length();
            if len > SAT_AXIS_EPSILON {
                axes.push(cross / len);
            }
        }
    }
    axes
}

/// Oriented box test with the separating axis theorem.
///
/// Returns as soon as one axis separates the boxes. Otherwise the axis with
/// the smallest overlap becomes the normal (pointing from `b` toward `a`) and
/// the overlap the depth. Contacts are the corners of either box whose
/// projection on the normal falls inside the shared interval, narrowed to
/// those inside both boxes when any are.
pub fn obb_obb(a: &BoxFrame, b: &BoxFrame) -> CollisionManifold {
    let offset = a.center - b.center;

    let mut best_axis = Vec3::ZERO;
    let mut best_overlap = f32::INFINITY;

    for axis in candidate_axes(a, b) {
        let overlap =
            a.projected_radius(axis) + b.projected_radius(axis) - offset.dot(axis).abs();
        // A NaN overlap must not read as contact
        if !overlap.is_finite() || overlap <= 0.0 {
            return CollisionManifold::separated();
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    let normal = if offset.dot(best_axis) < 0.0 {
        -best_axis
    } else {
        best_axis
    };

    let (min_a, max_a) = a.projected_interval(normal);
    let (min_b, max_b) = b.projected_interval(normal);
    let lo = min_a.max(min_b) - CONTAINMENT_TOLERANCE;
    let hi = max_a.min(max_b) + CONTAINMENT_TOLERANCE;

    let in_slab: Vec<Vec3> = a
        .corners()
        .into_iter()
        .chain(b.corners())
        .filter(|corner| {
            let p = corner.dot(normal);
            p >= lo && p <= hi
        })
        .collect();

    // Prefer corners inside both boxes; edge-on-edge hits have none
    let buried: Vec<Vec3> = in_slab
        .iter()
        .copied()
        .filter(|&corner| a.contains_point(corner) && b.contains_point(corner))
        .collect();
    let contacts = if buried.is_empty() { in_slab } else { buried };

    CollisionManifold::touching(normal, best_overlap, contacts)
}
