use crate::collision::{narrow_phase, BodyHandle, CollisionManifold};
use crate::dynamics::RigidBody;
use crate::error::PhysicsResult;
use crate::math::{Mat3, Pose, Quat, Vec3};

use super::aabb::Aabb;
use super::shape::{ColliderShape, Shape, ShapeKind};

/// Default bounciness for new colliders
pub const DEFAULT_RESTITUTION: f32 = 0.3;

/// A shape attached to a rigid body, with its cached world pose.
///
/// The pose is a copy pulled from the owning body by
/// [`update_from_body`](Self::update_from_body). It must be refreshed before
/// any narrow-phase test in the same step.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    shape: Shape,
    restitution: f32,
    was_collided: bool,
    body: Option<BodyHandle>,
    position: Vec3,
    orientation: Quat,
}

impl Collider {
    /// Creates a collider after checking the shape's dimensions
    pub fn new(shape: Shape) -> PhysicsResult<Self> {
        shape.validate()?;
        Ok(Self {
            shape,
            restitution: DEFAULT_RESTITUTION,
            was_collided: false,
            body: None,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        })
    }

    /// Sets the restitution, clamped to `[0, 1]`
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    /// Places the collider without a body, mostly for standalone queries
    pub fn with_pose(mut self, position: Vec3, orientation: Quat) -> Self {
        self.update_from_pose(position, orientation);
        self
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = if restitution.is_nan() {
            0.0
        } else {
            restitution.clamp(0.0, 1.0)
        };
    }

    /// Whether the last world step found this collider touching another.
    /// Only meant for debug drawing.
    #[inline]
    pub fn was_collided(&self) -> bool {
        self.was_collided
    }

    #[inline]
    pub(crate) fn set_was_collided(&mut self, value: bool) {
        self.was_collided = value;
    }

    /// Owning body, once attached through the world
    #[inline]
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Points the collider at its body; an invalid handle detaches it
    #[inline]
    pub(crate) fn set_body(&mut self, handle: BodyHandle) {
        self.body = handle.is_valid().then_some(handle);
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Identity for shapes that do not rotate with their body
    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// World bounds at the cached pose
    #[inline]
    pub fn world_bounds(&self) -> Aabb {
        self.shape.world_bounds(self.pose())
    }

    /// World-space contact candidates at the cached pose
    #[inline]
    pub fn support_points(&self) -> Vec<Vec3> {
        self.shape.support_points(self.pose())
    }

    /// Local inertia tensor for `mass`, recomputed from the current extents
    #[inline]
    pub fn calculate_inertia_tensor(&self, mass: f32) -> Mat3 {
        self.shape.local_inertia(mass)
    }

    /// Pulls the body's world position, and for oriented shapes its orientation
    pub fn update_from_body(&mut self, body: &RigidBody) {
        self.update_from_pose(body.position, body.orientation);
    }

    pub fn update_from_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = if self.shape.is_oriented() {
            orientation
        } else {
            Quat::IDENTITY
        };
    }

    /// Runs the narrow-phase test for this pair of shapes.
    ///
    /// The manifold normal points from `other` toward `self`.
    #[inline]
    pub fn collide(&self, other: &Collider) -> PhysicsResult<CollisionManifold> {
        narrow_phase::collide(self, other)
    }
}
