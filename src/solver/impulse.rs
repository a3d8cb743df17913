use crate::collision::Contact;
use crate::dynamics::{BodySet, RigidBody};
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::consts::EPSILON;
use crate::math::Vec3;

/// Configuration for the contact resolver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolverConfig {
    /// Fraction of the penetration removed per step (0-1)
    pub position_correction: f32,
    /// Penetration left uncorrected so resting contacts don't jitter
    pub slop: f32,
    /// Velocity passes over all contacts per step
    pub iterations: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            position_correction: 0.8,
            slop: 0.005,
            iterations: 1,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(0.0..=1.0).contains(&self.position_correction) {
            return Err(PhysicsError::InvalidConfig(format!(
                "position_correction must be in [0, 1], got {}",
                self.position_correction
            )));
        }
        if !self.slop.is_finite() || self.slop < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "slop must be finite and >= 0, got {}",
                self.slop
            )));
        }
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "resolver needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sequential impulse resolver for the contacts of one step.
///
/// Contact normals point from `pair.body_b` toward `pair.body_a`, so body A
/// is pushed along the normal and body B against it.
#[derive(Debug, Clone, Default)]
pub struct ImpulseResolver {
    config: ResolverConfig,
}

impl ImpulseResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    /// Applies restitution impulses, then pushes overlapping bodies apart
    pub fn resolve(&self, contacts: &[Contact], bodies: &mut BodySet) {
        for _ in 0..self.config.iterations.max(1) {
            for contact in contacts {
                if let Some((a, b)) = bodies.get_pair_mut(contact.pair.body_a, contact.pair.body_b) {
                    resolve_velocity(contact, a, b);
                }
            }
        }

        for contact in contacts {
            if let Some((a, b)) = bodies.get_pair_mut(contact.pair.body_a, contact.pair.body_b) {
                self.correct_position(contact, a, b);
            }
        }
    }

    /// Linear Baumgarte-style correction, split by inverse mass
    fn correct_position(&self, contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
        let inv_mass_sum = a.inv_mass() + b.inv_mass();
        if inv_mass_sum <= 0.0 {
            return;
        }

        let penetration = (contact.manifold.depth - self.config.slop).max(0.0);
        if penetration <= 0.0 {
            return;
        }

        let correction =
            contact.manifold.normal * (penetration * self.config.position_correction / inv_mass_sum);
        a.translate(correction * a.inv_mass());
        b.translate(-correction * b.inv_mass());
    }
}

/// Normal impulse at each contact point, shared evenly between the points
fn resolve_velocity(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
    if a.is_static() && b.is_static() {
        return;
    }

    let manifold = &contact.manifold;
    if manifold.contacts.is_empty() {
        return;
    }
    let normal = manifold.normal;
    let share = 1.0 / manifold.contacts.len() as f32;

    for &point in &manifold.contacts {
        let relative = a.velocity_at_point(point) - b.velocity_at_point(point);
        let along_normal = relative.dot(normal);

        // Already separating
        if along_normal >= 0.0 {
            continue;
        }

        let k = inverse_effective_mass(a, point, normal) + inverse_effective_mass(b, point, normal);
        if k <= EPSILON {
            continue;
        }

        let j = -(1.0 + contact.restitution) * along_normal / k * share;
        let impulse = normal * j;
        a.apply_impulse_at_point(impulse, point);
        b.apply_impulse_at_point(-impulse, point);
    }
}

/// `1/m + (r × n)·I⁻¹(r × n)`, zero for static bodies
fn inverse_effective_mass(body: &RigidBody, point: Vec3, normal: Vec3) -> f32 {
    if body.is_static() {
        return 0.0;
    }
    let rn = (point - body.position).cross(normal);
    body.inv_mass() + rn.dot(body.inv_inertia_world() * rn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BodyHandle, CollisionManifold, CollisionPair};
    use crate::dynamics::RigidBodyDesc;
    use crate::geometry::{Collider, Shape};

    fn ball(x: f32, vx: f32, mass: f32) -> RigidBody {
        RigidBodyDesc::dynamic()
            .with_position(Vec3::new(x, 0.0, 0.0))
            .with_linear_velocity(Vec3::new(vx, 0.0, 0.0))
            .with_mass(mass)
            .with_collider(Collider::new(Shape::sphere(0.5)).unwrap())
            .build()
            .unwrap()
    }

    fn head_on(a: BodyHandle, b: BodyHandle, restitution: f32, depth: f32) -> Contact {
        Contact {
            pair: CollisionPair { body_a: a, body_b: b },
            manifold: CollisionManifold::touching(Vec3::X, depth, [Vec3::ZERO]),
            restitution,
        }
    }

    #[test]
    fn test_elastic_head_on_swaps_velocities() {
        let mut bodies = BodySet::new();
        // A sits on +X of B and moves toward it
        let b = bodies.insert(ball(-0.45, 1.0, 1.0));
        let a = bodies.insert(ball(0.45, -1.0, 1.0));
        let contact = head_on(a, b, 1.0, 0.0);

        ImpulseResolver::default().resolve(&[contact], &mut bodies);

        let va = bodies.get(a).unwrap().linear_velocity;
        let vb = bodies.get(b).unwrap().linear_velocity;
        assert!((va - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((vb - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
        assert!(bodies.get(a).unwrap().angular_velocity.length() < 1e-6);
    }

    #[test]
    fn test_inelastic_contact_stops_approach() {
        let mut bodies = BodySet::new();
        let b = bodies.insert(ball(-0.45, 1.0, 1.0));
        let a = bodies.insert(ball(0.45, -1.0, 1.0));
        let contact = head_on(a, b, 0.0, 0.0);

        ImpulseResolver::default().resolve(&[contact], &mut bodies);

        let va = bodies.get(a).unwrap().linear_velocity;
        let vb = bodies.get(b).unwrap().linear_velocity;
        assert!((va - vb).dot(Vec3::X).abs() < 1e-5);
    }

    #[test]
    fn test_separating_bodies_are_left_alone() {
        let mut bodies = BodySet::new();
        let b = bodies.insert(ball(-0.45, -1.0, 1.0));
        let a = bodies.insert(ball(0.45, 1.0, 1.0));
        let contact = head_on(a, b, 1.0, 0.0);

        ImpulseResolver::default().resolve(&[contact], &mut bodies);
        assert_eq!(bodies.get(a).unwrap().linear_velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_position_correction_only_moves_dynamic_body() {
        let mut bodies = BodySet::new();
        let floor = bodies.insert(ball(0.0, 0.0, 0.0));
        let a = bodies.insert(ball(0.9, 0.0, 1.0));
        let contact = head_on(a, floor, 0.0, 0.105);

        ImpulseResolver::default().resolve(&[contact], &mut bodies);

        // (0.105 - 0.005) * 0.8 = 0.08, all of it on the dynamic body
        assert!((bodies.get(a).unwrap().position.x - 0.98).abs() < 1e-5);
        assert_eq!(bodies.get(floor).unwrap().position, Vec3::ZERO);
        let collider = bodies.get(a).unwrap().collider().unwrap();
        assert!((collider.position().x - 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_config_validation() {
        assert!(ResolverConfig::default().validate().is_ok());
        let bad = ResolverConfig {
            position_correction: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = ResolverConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
