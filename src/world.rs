use tracing::{debug, instrument, trace, warn};

use crate::collision::{BodyHandle, CollisionPair, Contact};
use crate::config::WorldConfig;
use crate::constraints::Constraint;
use crate::dynamics::{BodySet, RigidBody, RigidBodyDesc};
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Aabb, Collider, Shape, ShapeKind};
use crate::math::{Pose, Vec3};
use crate::solver::ImpulseResolver;

/// Counters for one [`World::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Bodies integrated
    pub bodies: usize,
    /// Pairs handed to the narrow phase
    pub pairs_tested: usize,
    /// Pairs found colliding
    pub contacts: usize,
}

/// What a debug renderer needs to draw one collider
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDebug {
    pub body: BodyHandle,
    pub kind: ShapeKind,
    pub pose: Pose,
    pub bounds: Aabb,
    pub was_collided: bool,
    /// Box corners, hull vertices or the sphere centre
    pub points: Vec<Vec3>,
}

/// The main physics world containing all bodies and managing simulation.
///
/// Every mutating method takes `&mut self`, so bodies can never be added or
/// removed while a step is running.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    bodies: BodySet,
    resolver: ImpulseResolver,
    constraints: Vec<Box<dyn Constraint>>,
    /// Colliding pairs from the last step
    contacts: Vec<Contact>,
    time: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Creates a new physics world with the given configuration.
    /// The configuration is checked on every [`step`](Self::step).
    pub fn new(config: WorldConfig) -> Self {
        Self {
            resolver: ImpulseResolver::new(config.resolver),
            config,
            bodies: BodySet::new(),
            constraints: Vec::new(),
            contacts: Vec::new(),
            time: 0.0,
        }
    }

    /// Like [`new`](Self::new), but rejects an invalid configuration
    pub fn try_new(config: WorldConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Sets the gravity. A non-finite value is rejected by the next
    /// [`step`](Self::step).
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Gets the gravity
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Creates a new rigid body and returns its handle
    pub fn create_body(&mut self, desc: RigidBodyDesc) -> PhysicsResult<BodyHandle> {
        let body = desc.build()?;
        Ok(self.add_body(body))
    }

    /// Takes ownership of an existing body
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.insert(body);
        debug!(?handle, "body added");
        handle
    }

    /// Attaches a collider to a body, replacing any previous one, and
    /// rebuilds the body's inertia from it
    pub fn attach_collider(&mut self, handle: BodyHandle, collider: Collider) -> PhysicsResult<()> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidBody(handle))?;
        body.set_collider(collider);
        Ok(())
    }

    /// Removes a body along with the constraints and contacts that use it
    pub fn remove_body(&mut self, handle: BodyHandle) -> PhysicsResult<RigidBody> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or(PhysicsError::InvalidBody(handle))?;

        self.constraints.retain(|c| {
            let (a, b) = c.bodies();
            a != handle && b != handle
        });
        self.contacts
            .retain(|c| c.pair.body_a != handle && c.pair.body_b != handle);

        debug!(?handle, "body removed");
        Ok(body)
    }

    /// Gets a reference to a body
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Gets a mutable reference to a body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// All live bodies in slot order
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.handles()
    }

    /// Returns the number of bodies in the world
    #[inline]
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Applies a force to a body at a world point
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3, point: Vec3) -> PhysicsResult<()> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidBody(handle))?;
        body.apply_force(force, point);
        Ok(())
    }

    /// Registers a joint. Both of its bodies must exist.
    pub fn add_constraint(&mut self, constraint: impl Constraint + 'static) -> PhysicsResult<()> {
        let (a, b) = constraint.bodies();
        for handle in [a, b] {
            if !self.bodies.contains(handle) {
                return Err(PhysicsError::InvalidBody(handle));
            }
        }
        self.constraints.push(Box::new(constraint));
        Ok(())
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Colliding pairs found by the last step
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Returns the current simulation time
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Per-collider records for a debug renderer
    pub fn debug_colliders(&self) -> impl Iterator<Item = ColliderDebug> + '_ {
        self.bodies.iter().filter_map(|body| {
            let collider = body.collider()?;
            Some(ColliderDebug {
                body: body.handle(),
                kind: collider.kind(),
                pose: collider.pose(),
                bounds: collider.world_bounds(),
                was_collided: collider.was_collided(),
                points: collider.support_points(),
            })
        })
    }

    /// Steps the simulation by `dt` seconds.
    ///
    /// Integrates every body, runs the narrow phase over every pair with at
    /// least one dynamic body, resolves the contacts, then solves the joint
    /// constraints. Everything that could fail is checked before any body
    /// moves, so an error leaves the world untouched.
    #[instrument(skip(self), level = "debug")]
    pub fn step(&mut self, dt: f32) -> PhysicsResult<StepStats> {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "rejected time step");
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        if let Err(err) = self.config.validate() {
            warn!(%err, "rejected world configuration");
            return Err(err);
        }
        let pairs = self.validate_step()?;

        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut() {
            body.simulate(dt, gravity)?;
        }

        self.detect_collisions(&pairs)?;
        self.resolver.resolve(&self.contacts, &mut self.bodies);

        for _ in 0..self.config.constraint_iterations {
            for constraint in &self.constraints {
                constraint.solve(&mut self.bodies, dt);
            }
        }

        self.time += dt;

        let stats = StepStats {
            bodies: self.bodies.len(),
            pairs_tested: pairs.len(),
            contacts: self.contacts.len(),
        };
        debug!(
            bodies = stats.bodies,
            pairs = stats.pairs_tested,
            contacts = stats.contacts,
            "step complete"
        );
        Ok(stats)
    }

    /// Checks every body has a collider and every pair has a narrow-phase
    /// test, returning the pairs to test
    fn validate_step(&self) -> PhysicsResult<Vec<CollisionPair>> {
        let mut colliders = Vec::with_capacity(self.bodies.len());
        for body in self.bodies.iter() {
            match body.collider() {
                Some(collider) => colliders.push((body.handle(), body.is_static(), collider)),
                None => {
                    warn!(handle = ?body.handle(), "body has no collider");
                    return Err(PhysicsError::MissingCollider(body.handle()));
                }
            }
        }

        let mut pairs = Vec::new();
        for (i, &(ha, static_a, ca)) in colliders.iter().enumerate() {
            for &(hb, static_b, cb) in &colliders[i + 1..] {
                if static_a && static_b {
                    continue;
                }
                if matches!(ca.shape(), Shape::ConvexHull(_))
                    || matches!(cb.shape(), Shape::ConvexHull(_))
                {
                    warn!(a = ?ha, b = ?hb, "no collision test for convex hulls");
                    return Err(PhysicsError::UnsupportedPair {
                        a: ca.kind(),
                        b: cb.kind(),
                    });
                }
                pairs.push(CollisionPair::new(ha, hb));
            }
        }
        Ok(pairs)
    }

    /// Narrow phase over `pairs`; fills `self.contacts` and the colliders'
    /// `was_collided` flags
    fn detect_collisions(&mut self, pairs: &[CollisionPair]) -> PhysicsResult<()> {
        self.contacts.clear();
        for body in self.bodies.iter_mut() {
            if let Some(collider) = body.collider_mut() {
                collider.set_was_collided(false);
            }
        }

        for &pair in pairs {
            let collider_a = self.bodies.get(pair.body_a).and_then(RigidBody::collider);
            let collider_b = self.bodies.get(pair.body_b).and_then(RigidBody::collider);
            let (Some(ca), Some(cb)) = (collider_a, collider_b) else {
                continue;
            };

            let manifold = ca.collide(cb)?;
            if !manifold.colliding {
                continue;
            }
            let restitution = ca.restitution().min(cb.restitution());
            trace!(
                a = ?pair.body_a,
                b = ?pair.body_b,
                depth = manifold.depth,
                points = manifold.contacts.len(),
                "contact"
            );

            for handle in [pair.body_a, pair.body_b] {
                if let Some(collider) = self.bodies.get_mut(handle).and_then(RigidBody::collider_mut) {
                    collider.set_was_collided(true);
                }
            }
            self.contacts.push(Contact {
                pair,
                manifold,
                restitution,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::DistanceConstraint;
    use crate::math::Quat;

    fn cube(half: f32) -> Collider {
        Collider::new(Shape::obb(Vec3::splat(half))).unwrap()
    }

    fn add_cube(world: &mut World, position: Vec3, mass: f32) -> BodyHandle {
        world
            .create_body(
                RigidBodyDesc::dynamic()
                    .with_position(position)
                    .with_mass(mass)
                    .with_collider(cube(0.5)),
            )
            .unwrap()
    }

    #[test]
    fn test_world_creation() {
        let world = World::default();
        assert_eq!(world.num_bodies(), 0);
        assert_eq!(world.gravity(), Vec3::new(0.0, -9.8, 0.0));
    }

    #[test]
    fn test_try_new_validates() {
        let bad = WorldConfig::default().with_gravity(Vec3::new(f32::INFINITY, 0.0, 0.0));
        assert!(World::try_new(bad).is_err());
        assert!(World::try_new(WorldConfig::default()).is_ok());
    }

    #[test]
    fn test_create_body_sets_back_reference() {
        let mut world = World::default();
        let handle = add_cube(&mut world, Vec3::new(0.0, 5.0, 0.0), 1.0);

        assert_eq!(world.num_bodies(), 1);
        let body = world.body(handle).unwrap();
        assert_eq!(body.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(body.collider().unwrap().body(), Some(handle));
    }

    #[test]
    fn test_step_without_collider_fails_fast() {
        let mut world = World::default();
        let ok = add_cube(&mut world, Vec3::new(0.0, 5.0, 0.0), 1.0);
        let bare = world.create_body(RigidBodyDesc::dynamic()).unwrap();

        assert_eq!(world.step(0.1), Err(PhysicsError::MissingCollider(bare)));
        // Nothing moved
        assert_eq!(world.body(ok).unwrap().position.y, 5.0);
        assert_eq!(world.time(), 0.0);

        world.attach_collider(bare, cube(0.5)).unwrap();
        assert!(world.step(0.1).is_ok());
    }

    #[test]
    fn test_step_rejects_bad_dt() {
        let mut world = World::default();
        assert!(matches!(world.step(-1.0), Err(PhysicsError::InvalidTimeStep(_))));
        assert!(world.step(f32::NAN).is_err());
    }

    #[test]
    fn test_non_finite_gravity_fails_before_integration() {
        let mut world = World::default();
        world
            .create_body(RigidBodyDesc::fixed().with_collider(
                Collider::new(Shape::obb(Vec3::new(5.0, 0.5, 5.0))).unwrap(),
            ))
            .unwrap();
        let resting = add_cube(&mut world, Vec3::new(0.0, 0.95, 0.0), 1.0);

        world.set_gravity(Vec3::new(0.0, f32::NAN, 0.0));
        assert!(matches!(world.step(0.1), Err(PhysicsError::InvalidConfig(_))));

        let body = world.body(resting).unwrap();
        assert_eq!(body.position, Vec3::new(0.0, 0.95, 0.0));
        assert_eq!(body.linear_velocity, Vec3::ZERO);
        assert!(world.contacts().is_empty());
        assert_eq!(world.time(), 0.0);

        world.set_gravity(Vec3::new(0.0, -9.8, 0.0));
        assert!(world.step(0.1).is_ok());
        assert!(world.body(resting).unwrap().position.is_finite());
    }

    #[test]
    fn test_hull_pairs_fail_before_integration() {
        let mut world = World::default();
        let hull = Collider::new(Shape::convex_hull(vec![Vec3::ZERO, Vec3::ONE])).unwrap();
        world
            .create_body(RigidBodyDesc::fixed().with_collider(hull))
            .unwrap();
        let falling = add_cube(&mut world, Vec3::new(0.0, 5.0, 0.0), 1.0);

        assert!(matches!(
            world.step(0.1),
            Err(PhysicsError::UnsupportedPair { .. })
        ));
        assert_eq!(world.body(falling).unwrap().position.y, 5.0);
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut world = World::default();
        add_cube(&mut world, Vec3::ZERO, 0.0);
        add_cube(&mut world, Vec3::new(0.2, 0.0, 0.0), 0.0);

        let stats = world.step(0.1).unwrap();
        assert_eq!(stats.pairs_tested, 0);
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn test_overlap_flags_and_contacts() {
        let mut world = World::new(WorldConfig::default().with_gravity(Vec3::ZERO));
        let a = add_cube(&mut world, Vec3::ZERO, 1.0);
        let b = add_cube(&mut world, Vec3::new(0.8, 0.0, 0.0), 1.0);
        let far = add_cube(&mut world, Vec3::new(10.0, 0.0, 0.0), 1.0);

        let stats = world.step(0.0).unwrap();
        assert_eq!(stats.pairs_tested, 3);
        assert_eq!(stats.contacts, 1);

        let contact = &world.contacts()[0];
        assert_eq!(contact.pair, CollisionPair::new(a, b));
        // Normal points from b toward a
        assert!(contact.manifold.normal.x < 0.0);

        assert!(world.body(a).unwrap().collider().unwrap().was_collided());
        assert!(world.body(b).unwrap().collider().unwrap().was_collided());
        assert!(!world.body(far).unwrap().collider().unwrap().was_collided());

        // Position correction pushed them apart
        assert!(world.body(a).unwrap().position.x < 0.0);
        assert!(world.body(b).unwrap().position.x > 0.8);
    }

    #[test]
    fn test_remove_body_drops_its_constraints() {
        let mut world = World::default();
        let a = add_cube(&mut world, Vec3::ZERO, 1.0);
        let b = add_cube(&mut world, Vec3::new(3.0, 0.0, 0.0), 1.0);
        world
            .add_constraint(DistanceConstraint::new(a, b, Vec3::ZERO, Vec3::ZERO, 3.0))
            .unwrap();
        assert_eq!(world.num_constraints(), 1);

        let removed = world.remove_body(a).unwrap();
        assert!(!removed.handle().is_valid());
        assert_eq!(world.num_bodies(), 1);
        assert_eq!(world.num_constraints(), 0);
        assert_eq!(world.remove_body(a), Err(PhysicsError::InvalidBody(a)));
        assert!(world
            .add_constraint(DistanceConstraint::new(a, b, Vec3::ZERO, Vec3::ZERO, 1.0))
            .is_err());
    }

    #[test]
    fn test_debug_colliders() {
        let mut world = World::default();
        let handle = world
            .create_body(
                RigidBodyDesc::dynamic()
                    .with_orientation(Quat::from_axis_angle(Vec3::Y, 0.4))
                    .with_collider(cube(0.5)),
            )
            .unwrap();

        let records: Vec<_> = world.debug_colliders().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, handle);
        assert_eq!(records[0].kind, ShapeKind::Obb);
        assert_eq!(records[0].points.len(), 8);
        assert!(!records[0].was_collided);
    }

    #[test]
    fn test_apply_force_through_world() {
        let mut world = World::default();
        let handle = add_cube(&mut world, Vec3::ZERO, 2.0);
        world
            .apply_force(handle, Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO)
            .unwrap();
        assert_eq!(world.body(handle).unwrap().linear_velocity, Vec3::new(0.0, 2.0, 0.0));
        assert!(world
            .apply_force(BodyHandle::new(5), Vec3::X, Vec3::ZERO)
            .is_err());
    }
}
