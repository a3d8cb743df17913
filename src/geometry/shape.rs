use crate::error::{PhysicsError, PhysicsResult};
use crate::math::{Mat3, Pose, Vec3};

use super::aabb::Aabb;

/// Which variant a [`Shape`] is. Used in errors and by debug renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    Aabb,
    Obb,
    Box,
    Sphere,
    ConvexHull,
}

/// Per-shape geometry the rest of the engine relies on.
///
/// Every operation takes the collider's world pose explicitly; shapes only
/// store local dimensions.
pub trait ColliderShape {
    /// Local-frame inertia tensor for a body of the given mass
    fn local_inertia(&self, mass: f32) -> Mat3;

    /// World-space bounds at `pose`
    fn world_bounds(&self, pose: Pose) -> Aabb;

    /// World-space points used as contact candidates (box corners, hull
    /// vertices, sphere centre)
    fn support_points(&self, pose: Pose) -> Vec<Vec3>;
}

/// A collision shape. The variant set is closed: narrow-phase dispatch
/// matches on pairs of these.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Box that never rotates with its body
    Aabb(AabbShape),
    /// Box that follows its body's orientation
    Obb(ObbShape),
    /// Older axis-aligned box used by the legacy collision path
    Box(BoxShape),
    /// Older sphere used by the legacy collision path
    Sphere(Sphere),
    /// Point cloud hull; renderable, but has no narrow-phase test yet
    ConvexHull(ConvexHull),
}

impl Shape {
    #[inline]
    pub fn aabb(half_extents: Vec3) -> Self {
        Self::Aabb(AabbShape::new(half_extents))
    }

    #[inline]
    pub fn obb(half_extents: Vec3) -> Self {
        Self::Obb(ObbShape::new(half_extents))
    }

    #[inline]
    pub fn legacy_box(half_extents: Vec3) -> Self {
        Self::Box(BoxShape::new(half_extents))
    }

    #[inline]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(Sphere::new(radius))
    }

    #[inline]
    pub fn convex_hull(points: Vec<Vec3>) -> Self {
        Self::ConvexHull(ConvexHull::new(points))
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Aabb(_) => ShapeKind::Aabb,
            Shape::Obb(_) => ShapeKind::Obb,
            Shape::Box(_) => ShapeKind::Box,
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::ConvexHull(_) => ShapeKind::ConvexHull,
        }
    }

    /// True for shapes that copy their body's orientation
    #[inline]
    pub fn is_oriented(&self) -> bool {
        matches!(self, Shape::Obb(_) | Shape::ConvexHull(_))
    }

    /// Box half-extents, for the three box-like variants
    #[inline]
    pub fn half_extents(&self) -> Option<Vec3> {
        match self {
            Shape::Aabb(s) => Some(s.half_extents),
            Shape::Obb(s) => Some(s.half_extents),
            Shape::Box(s) => Some(s.half_extents),
            Shape::Sphere(_) | Shape::ConvexHull(_) => None,
        }
    }

    /// Rejects zero, negative or non-finite dimensions and empty hulls
    pub fn validate(&self) -> PhysicsResult<()> {
        match self {
            Shape::Aabb(AabbShape { half_extents })
            | Shape::Obb(ObbShape { half_extents })
            | Shape::Box(BoxShape { half_extents }) => {
                if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
                    return Err(PhysicsError::InvalidShape(format!(
                        "half extents must be finite and positive, got {:?}",
                        half_extents
                    )));
                }
            }
            Shape::Sphere(Sphere { radius }) => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(PhysicsError::InvalidShape(format!(
                        "radius must be finite and positive, got {}",
                        radius
                    )));
                }
            }
            Shape::ConvexHull(hull) => {
                if hull.points.is_empty() || hull.points.iter().any(|p| !p.is_finite()) {
                    return Err(PhysicsError::InvalidShape(
                        "convex hull needs at least one finite point".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn as_collider_shape(&self) -> &dyn ColliderShape {
        match self {
            Shape::Aabb(s) => s,
            Shape::Obb(s) => s,
            Shape::Box(s) => s,
            Shape::Sphere(s) => s,
            Shape::ConvexHull(s) => s,
        }
    }
}

impl ColliderShape for Shape {
    #[inline]
    fn local_inertia(&self, mass: f32) -> Mat3 {
        self.as_collider_shape().local_inertia(mass)
    }

    #[inline]
    fn world_bounds(&self, pose: Pose) -> Aabb {
        self.as_collider_shape().world_bounds(pose)
    }

    #[inline]
    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        self.as_collider_shape().support_points(pose)
    }
}

/// Solid cuboid inertia from half-extents.
///
/// With full extents `w, h, d`:
/// `Ixx = m(h² + d²)/12`, `Iyy = m(w² + d²)/12`, `Izz = m(w² + h²)/12`.
#[inline]
pub fn box_inertia(half_extents: Vec3, mass: f32) -> Mat3 {
    let size = half_extents * 2.0;
    let (w2, h2, d2) = (size.x * size.x, size.y * size.y, size.z * size.z);
    Mat3::from_diagonal(Vec3::new(
        mass * (h2 + d2) / 12.0,
        mass * (w2 + d2) / 12.0,
        mass * (w2 + h2) / 12.0,
    ))
}

/// The 8 corners of a box with the given half-extents placed at `pose`
#[inline]
pub fn box_corners(half_extents: Vec3, pose: Pose) -> [Vec3; 8] {
    let h = half_extents;
    [
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
    ]
    .map(|c| pose.transform_point(c))
}

/// Axis-aligned box half-extents, never rotated
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AabbShape {
    pub half_extents: Vec3,
}

impl AabbShape {
    #[inline]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl ColliderShape for AabbShape {
    fn local_inertia(&self, mass: f32) -> Mat3 {
        box_inertia(self.half_extents, mass)
    }

    fn world_bounds(&self, pose: Pose) -> Aabb {
        Aabb::from_center_half_extents(pose.position, self.half_extents)
    }

    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        self.world_bounds(pose).corners().to_vec()
    }
}

/// Oriented box half-extents along its local axes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObbShape {
    pub half_extents: Vec3,
}

impl ObbShape {
    #[inline]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl ColliderShape for ObbShape {
    fn local_inertia(&self, mass: f32) -> Mat3 {
        box_inertia(self.half_extents, mass)
    }

    fn world_bounds(&self, pose: Pose) -> Aabb {
        // Each world half-extent is the sum of the absolute rotated axis contributions
        let rot = pose.rotation_matrix();
        let abs_rot = Mat3::from_cols(rot.col(0).abs(), rot.col(1).abs(), rot.col(2).abs());
        Aabb::from_center_half_extents(pose.position, abs_rot * self.half_extents)
    }

    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        box_corners(self.half_extents, pose).to_vec()
    }
}

/// Legacy box. Collides as an axis-aligned box whatever the body's rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxShape {
    pub half_extents: Vec3,
}

impl BoxShape {
    #[inline]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// Full size of the box
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }
}

impl ColliderShape for BoxShape {
    fn local_inertia(&self, mass: f32) -> Mat3 {
        box_inertia(self.half_extents, mass)
    }

    fn world_bounds(&self, pose: Pose) -> Aabb {
        Aabb::from_center_half_extents(pose.position, self.half_extents)
    }

    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        self.world_bounds(pose).corners().to_vec()
    }
}

/// Legacy sphere
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl ColliderShape for Sphere {
    fn local_inertia(&self, mass: f32) -> Mat3 {
        let i = 0.4 * mass * self.radius * self.radius;
        Mat3::from_diagonal(Vec3::splat(i))
    }

    fn world_bounds(&self, pose: Pose) -> Aabb {
        Aabb::from_center_half_extents(pose.position, Vec3::splat(self.radius))
    }

    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        vec![pose.position]
    }
}

/// Convex hull given by its local-space vertices
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvexHull {
    pub points: Vec<Vec3>,
}

impl ConvexHull {
    #[inline]
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Local bounds of the vertex cloud
    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.points)
    }
}

impl ColliderShape for ConvexHull {
    /// Approximated by the box inertia of the hull's local bounds, about the
    /// body origin
    fn local_inertia(&self, mass: f32) -> Mat3 {
        match self.local_bounds() {
            Some(bounds) => box_inertia(bounds.half_extents(), mass),
            None => Mat3::ZERO,
        }
    }

    fn world_bounds(&self, pose: Pose) -> Aabb {
        let world = self.support_points(pose);
        Aabb::from_points(&world).unwrap_or(Aabb::new(pose.position, pose.position))
    }

    fn support_points(&self, pose: Pose) -> Vec<Vec3> {
        self.points.iter().map(|&p| pose.transform_point(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_box_inertia_formula() {
        // Full extents 2 x 4 x 6
        let inertia = Shape::obb(Vec3::new(1.0, 2.0, 3.0)).local_inertia(12.0);
        let d = inertia.diagonal();
        assert!(approx_eq(d.x, 16.0 + 36.0));
        assert!(approx_eq(d.y, 4.0 + 36.0));
        assert!(approx_eq(d.z, 4.0 + 16.0));
        assert!(inertia.off_diagonal().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_inertia_scales_linearly_with_mass() {
        for shape in [
            Shape::aabb(Vec3::new(0.5, 1.0, 2.0)),
            Shape::obb(Vec3::new(0.5, 1.0, 2.0)),
            Shape::legacy_box(Vec3::new(0.5, 1.0, 2.0)),
            Shape::sphere(1.5),
        ] {
            let single = shape.local_inertia(3.0);
            let double = shape.local_inertia(6.0);
            assert_eq!(double.diagonal(), single.diagonal() * 2.0);
            assert!(double.off_diagonal().iter().all(|&e| e == 0.0));
        }
    }

    #[test]
    fn test_sphere_inertia() {
        let d = Shape::sphere(2.0).local_inertia(5.0).diagonal();
        assert!(approx_eq(d.x, 8.0));
        assert_eq!(d.x, d.y);
        assert_eq!(d.y, d.z);
    }

    #[test]
    fn test_obb_bounds_grow_when_rotated() {
        let shape = Shape::obb(Vec3::ONE);
        let flat = shape.world_bounds(Pose::IDENTITY);
        assert_eq!(flat.half_extents(), Vec3::ONE);

        let tilted = shape.world_bounds(Pose::new(
            Vec3::ZERO,
            Quat::from_axis_angle(Vec3::Z, PI / 4.0),
        ));
        assert!(approx_eq(tilted.half_extents().x, 2.0f32.sqrt()));
        assert!(approx_eq(tilted.half_extents().z, 1.0));
    }

    #[test]
    fn test_aabb_ignores_rotation() {
        let shape = Shape::aabb(Vec3::ONE);
        let bounds = shape.world_bounds(Pose::new(
            Vec3::new(3.0, 0.0, 0.0),
            Quat::from_axis_angle(Vec3::Z, PI / 4.0),
        ));
        assert_eq!(bounds.min, Vec3::new(2.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn test_box_corners_are_distinct() {
        let corners = box_corners(Vec3::new(1.0, 2.0, 3.0), Pose::from_position(Vec3::X));
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                assert!(a.distance(*b) > 1.0);
            }
        }
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        assert!(Shape::obb(Vec3::new(1.0, 0.0, 1.0)).validate().is_err());
        assert!(Shape::aabb(Vec3::new(1.0, f32::NAN, 1.0)).validate().is_err());
        assert!(Shape::sphere(-1.0).validate().is_err());
        assert!(Shape::convex_hull(Vec::new()).validate().is_err());
        assert!(Shape::legacy_box(Vec3::ONE).validate().is_ok());
    }

    #[test]
    fn test_hull_inertia_uses_local_bounds() {
        let hull = Shape::convex_hull(vec![Vec3::splat(-1.0), Vec3::splat(1.0)]);
        let expected = box_inertia(Vec3::ONE, 2.0);
        assert!(hull.local_inertia(2.0).approx_eq(expected, EPSILON));
    }

    #[test]
    fn test_shape_kinds() {
        assert_eq!(Shape::aabb(Vec3::ONE).kind(), ShapeKind::Aabb);
        assert_eq!(Shape::obb(Vec3::ONE).kind(), ShapeKind::Obb);
        assert_eq!(Shape::legacy_box(Vec3::ONE).kind(), ShapeKind::Box);
        assert_eq!(Shape::sphere(1.0).kind(), ShapeKind::Sphere);
        assert!(Shape::obb(Vec3::ONE).is_oriented());
        assert!(!Shape::legacy_box(Vec3::ONE).is_oriented());
    }
}
