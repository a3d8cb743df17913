use crate::collision::BodyHandle;
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::Collider;
use crate::math::{Mat3, Pose, Quat, Vec3};

use super::integrator::{damping_factor, rk4_linear, rk4_orientation};

/// Velocity retained per second when no damping is given
pub const DEFAULT_DAMPING: f32 = 0.99;

/// Layout version written into [`RigidBodyState`]
pub const STATE_VERSION: u32 = 1;

/// A rigid body in the physics simulation.
///
/// A mass of zero makes the body static: it never integrates, and forces and
/// impulses leave it untouched. Damping values are per-second retention
/// factors in `[0, 1]`, so `1.0` means no damping.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    handle: BodyHandle,

    /// Position in world space
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub orientation: Quat,

    /// Linear velocity
    pub linear_velocity: Vec3,
    /// Angular velocity in world space (radians per second)
    pub angular_velocity: Vec3,

    /// Linear velocity retained per second
    pub linear_damping: f32,
    /// Angular velocity retained per second
    pub angular_damping: f32,

    mass: f32,
    inv_mass: f32,
    inertia: Mat3,
    inv_inertia: Mat3,

    collider: Option<Collider>,
}

impl RigidBody {
    /// Creates a body with a collider at `position`
    pub fn new(position: Vec3, mass: f32, collider: Collider) -> PhysicsResult<Self> {
        RigidBodyDesc::dynamic()
            .with_position(position)
            .with_mass(mass)
            .with_collider(collider)
            .build()
    }

    fn from_desc(desc: RigidBodyDesc) -> PhysicsResult<Self> {
        let mut body = Self {
            handle: BodyHandle::INVALID,
            position: desc.position,
            orientation: desc.orientation.normalize(),
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            linear_damping: desc.linear_damping.clamp(0.0, 1.0),
            angular_damping: desc.angular_damping.clamp(0.0, 1.0),
            mass: 0.0,
            inv_mass: 0.0,
            inertia: Mat3::ZERO,
            inv_inertia: Mat3::ZERO,
            collider: desc.collider,
        };
        body.set_mass(desc.mass)?;
        body.sync_collider_pose();
        Ok(body)
    }

    #[inline]
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Assigns the world handle and points the collider back at it.
    /// [`BodyHandle::INVALID`] clears the collider's back-reference.
    pub(crate) fn set_handle(&mut self, handle: BodyHandle) {
        self.handle = handle;
        if let Some(collider) = &mut self.collider {
            collider.set_body(handle);
        }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass, 0 for static bodies
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Local-frame inertia tensor
    #[inline]
    pub fn inertia(&self) -> Mat3 {
        self.inertia
    }

    /// Local-frame inverse inertia tensor
    #[inline]
    pub fn inv_inertia(&self) -> Mat3 {
        self.inv_inertia
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    #[inline]
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    #[inline]
    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Attaches (or replaces) the collider and recomputes the inertia for
    /// its shape
    pub fn set_collider(&mut self, mut collider: Collider) {
        collider.set_body(self.handle);
        self.collider = Some(collider);
        self.update_inertia();
        self.sync_collider_pose();
    }

    /// Sets the mass. Zero makes the body static.
    ///
    /// Negative or non-finite values are rejected and leave the body as it
    /// was. Inertia is rebuilt from the collider's current extents; a body
    /// without a collider gets no rotational response.
    pub fn set_mass(&mut self, mass: f32) -> PhysicsResult<()> {
        if !mass.is_finite() {
            return Err(PhysicsError::NonFiniteMass(mass));
        }
        if mass < 0.0 {
            return Err(PhysicsError::NegativeMass(mass));
        }

        self.mass = mass;
        self.inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        self.update_inertia();
        Ok(())
    }

    fn update_inertia(&mut self) {
        if self.is_static() {
            self.inertia = Mat3::ZERO;
            self.inv_inertia = Mat3::ZERO;
            return;
        }
        self.inertia = match &self.collider {
            Some(collider) => collider.calculate_inertia_tensor(self.mass),
            None => Mat3::ZERO,
        };
        self.inv_inertia = self.inertia.try_inverse().unwrap_or(Mat3::ZERO);
    }

    /// Inverse inertia rotated into world space: `R I⁻¹ Rᵀ`
    pub fn inv_inertia_world(&self) -> Mat3 {
        let rot = Mat3::from_quat(self.orientation);
        rot * self.inv_inertia * rot.transpose()
    }

    fn sync_collider_pose(&mut self) {
        let (position, orientation) = (self.position, self.orientation);
        if let Some(collider) = &mut self.collider {
            collider.update_from_pose(position, orientation);
        }
    }

    /// Copies the body pose into the collider
    fn refresh_collider(&mut self) -> PhysicsResult<()> {
        if self.collider.is_none() {
            return Err(PhysicsError::MissingCollider(self.handle));
        }
        self.sync_collider_pose();
        Ok(())
    }

    /// Advances the body by `dt` under `gravity`.
    ///
    /// Position and velocity use RK4 under constant gravity, the orientation
    /// uses RK4 on `q̇ = ½ (ω, 0) q` and is renormalized. Damping is applied
    /// after each part. The collider pose is refreshed before and after, so
    /// the narrow phase always sees the integrated pose.
    pub fn simulate(&mut self, dt: f32, gravity: Vec3) -> PhysicsResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        self.refresh_collider()?;
        if self.is_static() {
            return Ok(());
        }

        let (position, velocity) = rk4_linear(self.position, self.linear_velocity, gravity, dt);
        self.position = position;
        self.linear_velocity = velocity * damping_factor(self.linear_damping, dt);

        self.orientation = rk4_orientation(self.orientation, self.angular_velocity, dt);
        self.angular_velocity *= damping_factor(self.angular_damping, dt);

        self.refresh_collider()
    }

    /// Applies a force at a world point as an instantaneous velocity change.
    /// The torque arm is taken from the body's centre.
    pub fn apply_force(&mut self, force: Vec3, point: Vec3) {
        if self.is_static() {
            return;
        }
        self.linear_velocity += force * self.inv_mass;
        let r = point - self.position;
        self.angular_velocity += self.inv_inertia_world() * r.cross(force);
    }

    /// Applies an impulse at the center of mass
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_dynamic() {
            self.linear_velocity += impulse * self.inv_mass;
        }
    }

    /// Applies an impulse at a world point
    pub fn apply_impulse_at_point(&mut self, impulse: Vec3, point: Vec3) {
        if self.is_dynamic() {
            self.linear_velocity += impulse * self.inv_mass;
            let r = point - self.position;
            self.angular_velocity += self.inv_inertia_world() * r.cross(impulse);
        }
    }

    /// Gets the velocity at a world point
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(point - self.position)
    }

    /// Moves the body and keeps its collider in step. Used by position
    /// correction.
    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.sync_collider_pose();
    }

    /// Snapshot of the body's kinematic state
    pub fn state(&self) -> RigidBodyState {
        RigidBodyState {
            version: STATE_VERSION,
            position: self.position,
            orientation: self.orientation,
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
            mass: self.mass,
        }
    }

    /// Restores a snapshot taken with [`state`](Self::state).
    /// Nothing changes if the version or mass is rejected.
    pub fn restore_state(&mut self, state: &RigidBodyState) -> PhysicsResult<()> {
        if state.version != STATE_VERSION {
            return Err(PhysicsError::StateVersion {
                found: state.version,
                expected: STATE_VERSION,
            });
        }
        self.set_mass(state.mass)?;
        self.position = state.position;
        self.orientation = state.orientation.normalize();
        self.linear_velocity = state.linear_velocity;
        self.angular_velocity = state.angular_velocity;
        self.sync_collider_pose();
        Ok(())
    }
}

/// Versioned, serializable copy of a body's kinematic state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidBodyState {
    pub version: u32,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
}

/// Description for creating a rigid body
#[derive(Debug, Clone)]
pub struct RigidBodyDesc {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub collider: Option<Collider>,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            linear_damping: DEFAULT_DAMPING,
            angular_damping: DEFAULT_DAMPING,
            collider: None,
        }
    }
}

impl RigidBodyDesc {
    /// Creates a new dynamic body description
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// Creates a new static body description
    pub fn fixed() -> Self {
        Self {
            mass: 0.0,
            ..Self::default()
        }
    }

    /// Sets the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Sets the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Sets both retention factors
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Builds the body, validating the mass
    pub fn build(self) -> PhysicsResult<RigidBody> {
        RigidBody::from_desc(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;

    fn cube_body(mass: f32) -> RigidBody {
        let collider = Collider::new(Shape::obb(Vec3::splat(0.5))).unwrap();
        RigidBody::new(Vec3::ZERO, mass, collider).unwrap()
    }

    #[test]
    fn test_body_creation() {
        let body = RigidBodyDesc::dynamic()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_mass(2.0)
            .build()
            .unwrap();

        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert!((body.inv_mass() - 0.5).abs() < 0.0001);
        assert!(!body.handle().is_valid());
    }

    #[test]
    fn test_static_body() {
        let body = cube_body(0.0);

        assert!(body.is_static());
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(body.inv_inertia(), Mat3::ZERO);
    }

    #[test]
    fn test_set_mass_rejects_bad_values() {
        let mut body = cube_body(2.0);
        let before = body.clone();

        assert_eq!(body.set_mass(-1.0), Err(PhysicsError::NegativeMass(-1.0)));
        assert!(matches!(body.set_mass(f32::NAN), Err(PhysicsError::NonFiniteMass(_))));
        assert!(body.set_mass(f32::INFINITY).is_err());
        assert_eq!(body, before);
    }

    #[test]
    fn test_set_mass_rebuilds_inertia() {
        let mut body = cube_body(1.0);
        let single = body.inertia();
        body.set_mass(2.0).unwrap();
        assert_eq!(body.inertia().diagonal(), single.diagonal() * 2.0);
        assert!(body
            .inv_inertia()
            .approx_eq(Mat3::from_diagonal(Vec3::splat(3.0)), 1e-4));

        body.set_mass(0.0).unwrap();
        assert!(body.is_static());
    }

    #[test]
    fn test_simulate_without_collider_fails() {
        let mut body = RigidBodyDesc::dynamic().build().unwrap();
        let err = body.simulate(0.1, Vec3::new(0.0, -9.8, 0.0)).unwrap_err();
        assert_eq!(err, PhysicsError::MissingCollider(BodyHandle::INVALID));
        assert_eq!(body.position, Vec3::ZERO);
    }

    #[test]
    fn test_simulate_rejects_bad_dt() {
        let mut body = cube_body(1.0);
        assert!(body.simulate(-0.1, Vec3::ZERO).is_err());
        assert!(body.simulate(f32::NAN, Vec3::ZERO).is_err());
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut body = cube_body(0.0);
        body.linear_velocity = Vec3::new(1.0, 0.0, 0.0);
        body.angular_velocity = Vec3::new(0.0, 1.0, 0.0);
        for _ in 0..10 {
            body.simulate(0.1, Vec3::new(0.0, -9.8, 0.0)).unwrap();
        }
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_free_fall_one_step() {
        let mut body = cube_body(1.0);
        body.linear_damping = 1.0;
        body.simulate(0.1, Vec3::new(0.0, -9.8, 0.0)).unwrap();

        assert!((body.linear_velocity.y + 0.98).abs() < 1e-5);
        assert!((body.position.y + 0.049).abs() < 1e-5);
        assert_eq!(body.collider().unwrap().position(), body.position);
    }

    #[test]
    fn test_collider_follows_rotation() {
        let mut body = cube_body(1.0);
        body.angular_velocity = Vec3::new(0.0, 2.0, 0.0);
        body.simulate(0.1, Vec3::ZERO).unwrap();
        assert_eq!(body.collider().unwrap().orientation(), body.orientation);
        assert!((body.orientation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_apply_force_through_center() {
        let mut body = cube_body(2.0);
        body.apply_force(Vec3::new(4.0, 0.0, 0.0), body.position);
        assert_eq!(body.linear_velocity, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_apply_force_off_center_spins() {
        let mut body = cube_body(1.0);
        body.apply_force(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 0.0, 0.0));
        // r × F = (0.5,0,0) × (0,1,0) = (0,0,0.5); unit cube of mass 1 has I⁻¹ = 6
        assert!((body.angular_velocity - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_static_body_ignores_force() {
        let mut body = cube_body(0.0);
        body.apply_force(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        body.apply_impulse_at_point(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(body.linear_velocity, Vec3::ZERO);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_velocity_at_point() {
        let mut body = cube_body(1.0);
        body.linear_velocity = Vec3::new(1.0, 0.0, 0.0);
        body.angular_velocity = Vec3::new(0.0, 0.0, 1.0);

        // (0,0,1) × (0,1,0) = (-1,0,0) cancels the linear part
        let vel = body.velocity_at_point(Vec3::new(0.0, 1.0, 0.0));
        assert!(vel.length() < 0.0001);
    }

    #[test]
    fn test_state_round_trip_and_version() {
        let mut body = cube_body(1.0);
        body.linear_velocity = Vec3::new(0.0, 3.0, 0.0);
        let snapshot = body.state();

        body.simulate(0.5, Vec3::new(0.0, -9.8, 0.0)).unwrap();
        body.restore_state(&snapshot).unwrap();
        assert_eq!(body.state(), snapshot);

        let stale = RigidBodyState {
            version: STATE_VERSION + 1,
            ..snapshot
        };
        assert_eq!(
            body.restore_state(&stale),
            Err(PhysicsError::StateVersion {
                found: STATE_VERSION + 1,
                expected: STATE_VERSION
            })
        );
    }
}
