use crate::collision::BodyHandle;
use crate::dynamics::BodySet;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::consts::EPSILON;
use crate::math::Vec3;

use super::Constraint;

/// Keeps two body-local anchor points at a fixed distance.
///
/// Solved positionally: each pass moves both bodies along the anchor line by
/// their share of inverse mass, and turns the move into a velocity change so
/// the next step does not undo it. `compliance` softens the rod (0 is rigid).
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceConstraint {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Anchor on A in A's local frame
    pub anchor_a: Vec3,
    /// Anchor on B in B's local frame
    pub anchor_b: Vec3,
    pub rest_length: f32,
    pub compliance: f32,
}

impl DistanceConstraint {
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vec3,
        anchor_b: Vec3,
        rest_length: f32,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            rest_length: rest_length.max(0.0),
            compliance: 0.0,
        }
    }

    /// Uses the current anchor separation as the rest length
    pub fn from_current(
        bodies: &BodySet,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vec3,
        anchor_b: Vec3,
    ) -> PhysicsResult<Self> {
        let a = bodies.get(body_a).ok_or(PhysicsError::InvalidBody(body_a))?;
        let b = bodies.get(body_b).ok_or(PhysicsError::InvalidBody(body_b))?;
        let world_a = a.pose().transform_point(anchor_a);
        let world_b = b.pose().transform_point(anchor_b);
        Ok(Self::new(
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            world_a.distance(world_b),
        ))
    }

    pub fn with_compliance(mut self, compliance: f32) -> Self {
        self.compliance = compliance.max(0.0);
        self
    }
}

impl Constraint for DistanceConstraint {
    fn bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }

    fn solve(&self, bodies: &mut BodySet, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let Some((a, b)) = bodies.get_pair_mut(self.body_a, self.body_b) else {
            return;
        };
        if a.is_static() && b.is_static() {
            return;
        }

        let ra = a.orientation.rotate_vec(self.anchor_a);
        let rb = b.orientation.rotate_vec(self.anchor_b);
        let diff = (b.position + rb) - (a.position + ra);
        let dist = diff.length();

        let error = dist - self.rest_length;
        if error.abs() < EPSILON {
            return;
        }

        let n = if dist > EPSILON { diff / dist } else { Vec3::Y };

        let inv_inertia_a = a.inv_inertia_world();
        let inv_inertia_b = b.inv_inertia_world();
        let ra_n = ra.cross(n);
        let rb_n = rb.cross(n);
        let w = a.inv_mass()
            + ra_n.dot(inv_inertia_a * ra_n)
            + b.inv_mass()
            + rb_n.dot(inv_inertia_b * rb_n);
        if w <= 0.0 {
            return;
        }

        let alpha = self.compliance / (dt * dt);
        let correction = n * (-error / (w + alpha));

        a.translate(-correction * a.inv_mass());
        b.translate(correction * b.inv_mass());

        a.linear_velocity -= correction * (a.inv_mass() / dt);
        b.linear_velocity += correction * (b.inv_mass() / dt);
        a.angular_velocity -= inv_inertia_a * ra.cross(correction) / dt;
        b.angular_velocity += inv_inertia_b * rb.cross(correction) / dt;
    }
}
