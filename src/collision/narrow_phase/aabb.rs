use crate::collision::CollisionManifold;
use crate::geometry::Aabb;
use crate::math::Vec3;

/// Axis-aligned box test on world bounds.
///
/// Colliding only when all three per-axis overlaps are strictly positive. The
/// smallest overlap picks the normal (X wins ties over Y, Y over Z), signed to
/// point from `b` toward `a`. Contacts are the corners of the intersection box
/// that lie inside both boxes.
pub fn aabb_aabb(a: Aabb, b: Aabb) -> CollisionManifold {
    let overlaps = a.overlaps(b);
    if !overlaps.is_finite() || overlaps.min_element() <= 0.0 {
        return CollisionManifold::separated();
    }

    let mut axis = 0;
    for i in 1..3 {
        if overlaps[i] < overlaps[axis] {
            axis = i;
        }
    }

    let offset = a.center()[axis] - b.center()[axis];
    let normal = if offset < 0.0 {
        -Vec3::AXES[axis]
    } else {
        Vec3::AXES[axis]
    };

    let region = a.intersection(b);
    let contacts = region
        .corners()
        .into_iter()
        .filter(|&corner| a.contains_point(corner) && b.contains_point(corner));

    CollisionManifold::touching(normal, overlaps[axis], contacts)
}
