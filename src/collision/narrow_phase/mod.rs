//! Pairwise shape tests.
//!
//! [`collide`] picks the test for a pair of colliders. Every test reports
//! its normal pointing from the second collider toward the first. The pair is
//! always tested in one canonical order and the result flipped when the
//! arguments arrive the other way round, so swapping them negates the normal
//! even for concentric shapes.

mod aabb;
mod sat;
mod sphere;

pub use aabb::aabb_aabb;
pub use sat::{obb_obb, BoxFrame};
pub use sphere::sphere_box;

use std::cmp::Ordering;

use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Collider, Shape};
use crate::math::Vec3;

use super::legacy;
use super::CollisionManifold;

/// Box frame of a box-like collider at its cached pose.
/// Non-oriented shapes carry the identity orientation, so their frame is
/// axis-aligned.
fn box_frame(collider: &Collider) -> Option<BoxFrame> {
    collider
        .shape()
        .half_extents()
        .map(|h| BoxFrame::new(collider.pose(), h))
}

/// Dimensions then pose, compared after the shape kind
fn sort_key(collider: &Collider) -> [f32; 10] {
    let size = match collider.shape() {
        Shape::Sphere(s) => Vec3::splat(s.radius),
        shape => shape.half_extents().unwrap_or(Vec3::ZERO),
    };
    let p = collider.position();
    let q = collider.orientation();
    [size.x, size.y, size.z, p.x, p.y, p.z, q.x, q.y, q.z, q.w]
}

/// Total order deciding which collider a test sees first. Only colliders
/// with the same shape, size and pose compare equal.
fn canonical_order(a: &Collider, b: &Collider) -> Ordering {
    a.kind().cmp(&b.kind()).then_with(|| {
        sort_key(a)
            .iter()
            .zip(sort_key(b).iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

fn unsupported(a: &Collider, b: &Collider) -> PhysicsError {
    PhysicsError::UnsupportedPair {
        a: a.kind(),
        b: b.kind(),
    }
}

/// Runs the narrow-phase test for `a` against `b`.
///
/// | a \ b  | Aabb   | Obb    | Box    | Sphere | Hull |
/// |--------|--------|--------|--------|--------|------|
/// | Aabb   | AABB   | SAT    | AABB   | sphere | err  |
/// | Obb    | SAT    | SAT    | SAT    | sphere | err  |
/// | Box    | AABB   | SAT    | legacy | legacy | err  |
/// | Sphere | sphere | sphere | legacy | legacy | err  |
/// | Hull   | err    | err    | err    | err    | err  |
///
/// Two identical colliders at the same pose have no direction between them;
/// the normal then falls back to a fixed axis.
pub fn collide(a: &Collider, b: &Collider) -> PhysicsResult<CollisionManifold> {
    if matches!(a.shape(), Shape::ConvexHull(_)) || matches!(b.shape(), Shape::ConvexHull(_)) {
        return Err(unsupported(a, b));
    }
    if canonical_order(a, b) == Ordering::Greater {
        return Ok(collide_ordered(b, a)?.flipped());
    }
    collide_ordered(a, b)
}

fn collide_ordered(a: &Collider, b: &Collider) -> PhysicsResult<CollisionManifold> {
    let manifold = match (a.shape(), b.shape()) {
        (Shape::ConvexHull(_), _) | (_, Shape::ConvexHull(_)) => {
            return Err(unsupported(a, b));
        }
        (Shape::Box(_) | Shape::Sphere(_), Shape::Box(_) | Shape::Sphere(_)) => {
            legacy::check_collision(a, b)?.into_manifold()
        }
        (Shape::Sphere(s), Shape::Aabb(_) | Shape::Obb(_)) => {
            let frame = box_frame(b).ok_or_else(|| unsupported(a, b))?;
            sphere_box(a.position(), s.radius, &frame)
        }
        (Shape::Aabb(_) | Shape::Obb(_), Shape::Sphere(s)) => {
            let frame = box_frame(a).ok_or_else(|| unsupported(a, b))?;
            sphere_box(b.position(), s.radius, &frame).flipped()
        }
        (Shape::Aabb(_) | Shape::Box(_), Shape::Aabb(_) | Shape::Box(_)) => {
            aabb_aabb(a.world_bounds(), b.world_bounds())
        }
        // Remaining pairs are box-like with at least one Obb
        _ => match (box_frame(a), box_frame(b)) {
            (Some(fa), Some(fb)) => obb_obb(&fa, &fb),
            _ => return Err(unsupported(a, b)),
        },
    };
    Ok(manifold)
}
