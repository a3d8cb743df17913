use crate::collision::CollisionManifold;
use crate::math::Vec3;

use super::sat::BoxFrame;

/// Sphere against a (possibly rotated) box. The normal points from the box
/// toward the sphere.
///
/// The sphere centre is clamped into the box's local frame. A centre outside
/// the box uses the clamped point as contact. A centre inside pushes out
/// through the nearest face.
pub fn sphere_box(center: Vec3, radius: f32, frame: &BoxFrame) -> CollisionManifold {
    if !center.is_finite() || !frame.center.is_finite() {
        return CollisionManifold::separated();
    }
    let offset = center - frame.center;
    let local = Vec3::new(
        offset.dot(frame.axes[0]),
        offset.dot(frame.axes[1]),
        offset.dot(frame.axes[2]),
    );
    let h = frame.half_extents;
    let clamped = local.clamp(-h, h);
    let to_world =
        |p: Vec3| frame.center + frame.axes[0] * p.x + frame.axes[1] * p.y + frame.axes[2] * p.z;

    if clamped != local {
        let closest = to_world(clamped);
        let diff = center - closest;
        let distance_sq = diff.length_squared();
        if distance_sq >= radius * radius {
            return CollisionManifold::separated();
        }
        // A centre on the surface has no direction; treat it as inside
        if let Some(normal) = diff.try_normalize() {
            return CollisionManifold::touching(normal, radius - distance_sq.sqrt(), [closest]);
        }
    }

    // Centre inside: leave through the face with the least clearance
    let clearance = h - local.abs();
    let mut axis = 0;
    for i in 1..3 {
        if clearance[i] < clearance[axis] {
            axis = i;
        }
    }
    let sign = if local[axis] < 0.0 { -1.0 } else { 1.0 };

    let mut on_face = local;
    on_face[axis] = sign * h[axis];

    CollisionManifold::touching(
        frame.axes[axis] * sign,
        radius + clearance[axis],
        [to_world(on_face)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Pose, Quat};
    use std::f32::consts::PI;

    fn unit_box() -> BoxFrame {
        BoxFrame::new(Pose::IDENTITY, Vec3::ONE)
    }

    #[test]
    fn test_sphere_outside_face() {
        let m = sphere_box(Vec3::new(0.0, 1.5, 0.0), 1.0, &unit_box());
        assert!(m.colliding);
        assert_eq!(m.normal, Vec3::Y);
        assert!((m.depth - 0.5).abs() < 1e-6);
        assert_eq!(m.contacts, vec![Vec3::new(0.0, 1.0, 0.0)]);
    }

    #[test]
    fn test_sphere_clear_of_box() {
        assert!(!sphere_box(Vec3::new(3.0, 0.0, 0.0), 1.0, &unit_box()).colliding);
        // Near the corner diagonal but still outside the radius
        assert!(!sphere_box(Vec3::new(1.8, 1.8, 0.0), 1.0, &unit_box()).colliding);
    }

    #[test]
    fn test_center_inside_pushes_through_nearest_face() {
        let m = sphere_box(Vec3::new(0.2, -0.9, 0.1), 0.5, &unit_box());
        assert!(m.colliding);
        assert_eq!(m.normal, -Vec3::Y);
        assert!((m.depth - 0.6).abs() < 1e-6);
        assert!((m.contacts[0] - Vec3::new(0.2, -1.0, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_rotated_box_uses_local_frame() {
        let frame = BoxFrame::new(
            Pose::new(Vec3::ZERO, Quat::from_axis_angle(Vec3::Z, PI / 4.0)),
            Vec3::ONE,
        );
        // On the diagonal the rotated box reaches only its face at distance 1
        let m = sphere_box(Vec3::new(1.2, 1.2, 0.0) * (1.0 / 2.0f32.sqrt()), 0.5, &frame);
        assert!(m.colliding);
        assert!((m.depth - 0.3).abs() < 1e-4);
        assert!((m.normal - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-4);
    }
}
