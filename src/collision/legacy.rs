//! Older single-contact collision path for [`Shape::Box`] and
//! [`Shape::Sphere`].
//!
//! Boxes here are always treated as axis aligned, whatever the body's
//! rotation. Sphere/sphere contacts report a penetration of zero; callers that
//! need a depth should use [`Shape::Aabb`] or [`Shape::Obb`] instead.

use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Aabb, Collider, Shape};
use crate::math::Vec3;

use super::CollisionManifold;

/// Single-point collision result. `normal` points from the second shape
/// toward the first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    pub colliding: bool,
    pub contact_point: Vec3,
    pub normal: Vec3,
    pub penetration: f32,
}

impl CollisionResult {
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    /// Lifts the result into the common manifold type
    pub fn into_manifold(self) -> CollisionManifold {
        if self.colliding {
            CollisionManifold::touching(self.normal, self.penetration, [self.contact_point])
        } else {
            CollisionManifold::separated()
        }
    }

    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Tests two legacy colliders against each other
pub fn check_collision(a: &Collider, b: &Collider) -> PhysicsResult<CollisionResult> {
    match (a.shape(), b.shape()) {
        (Shape::Box(_), Shape::Box(_)) => Ok(box_box(a.world_bounds(), b.world_bounds())),
        (Shape::Sphere(sa), Shape::Sphere(sb)) => {
            Ok(sphere_sphere(a.position(), sa.radius, b.position(), sb.radius))
        }
        (Shape::Sphere(s), Shape::Box(_)) => {
            Ok(sphere_box(a.position(), s.radius, b.world_bounds()))
        }
        (Shape::Box(_), Shape::Sphere(s)) => {
            Ok(sphere_box(b.position(), s.radius, a.world_bounds()).flipped())
        }
        _ => Err(PhysicsError::UnsupportedPair {
            a: a.kind(),
            b: b.kind(),
        }),
    }
}

/// Bounds overlap with the contact at the centre of the shared region
pub fn box_box(a: Aabb, b: Aabb) -> CollisionResult {
    let overlaps = a.overlaps(b);
    if !overlaps.is_finite() || overlaps.min_element() <= 0.0 {
        return CollisionResult::none();
    }

    let mut axis = 0;
    for i in 1..3 {
        if overlaps[i] < overlaps[axis] {
            axis = i;
        }
    }
    let normal = if a.center()[axis] - b.center()[axis] < 0.0 {
        -Vec3::AXES[axis]
    } else {
        Vec3::AXES[axis]
    };

    CollisionResult {
        colliding: true,
        contact_point: a.intersection(b).center(),
        normal,
        penetration: overlaps[axis],
    }
}

/// Centre distance against the radius sum. Contact at the midpoint of the
/// centres, penetration always 0.
pub fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> CollisionResult {
    let diff = center_a - center_b;
    let reach = radius_a + radius_b;
    let distance_sq = diff.length_squared();
    if !distance_sq.is_finite() || distance_sq >= reach * reach {
        return CollisionResult::none();
    }

    CollisionResult {
        colliding: true,
        contact_point: (center_a + center_b) * 0.5,
        normal: diff.try_normalize().unwrap_or(Vec3::Y),
        penetration: 0.0,
    }
}

/// Sphere against axis-aligned bounds. The normal points from the box toward
/// the sphere; a centre inside the box falls back to the direction from the
/// box centre.
pub fn sphere_box(center: Vec3, radius: f32, bounds: Aabb) -> CollisionResult {
    let closest = bounds.closest_point(center);
    let diff = center - closest;
    let distance_sq = diff.length_squared();
    if !distance_sq.is_finite() || distance_sq >= radius * radius {
        return CollisionResult::none();
    }

    let distance = distance_sq.sqrt();
    let normal = diff
        .try_normalize()
        .or_else(|| (center - bounds.center()).try_normalize())
        .unwrap_or(Vec3::Y);

    CollisionResult {
        colliding: true,
        contact_point: closest,
        normal,
        penetration: radius - distance,
    }
}
