//! # rigidcore
//!
//! Rigid-body dynamics and collision detection for small 3D scenes.
//!
//! ## Features
//!
//! - **Rigid Body Dynamics**: RK4 integration of position, velocity and
//!   orientation under gravity, with per-second damping
//! - **Collision Detection**: axis-aligned box overlap, 15-axis SAT for
//!   oriented boxes, sphere against box, and an older single-contact path
//! - **Collision Shapes**: AABB, OBB, legacy box and sphere, and convex hulls
//!   for debug drawing
//! - **Contact Resolution**: restitution impulses with linear position
//!   correction
//! - **Constraints**: distance joints between body anchors
//!
//! ## Quick Start
//!
//! ```rust
//! use rigidcore::prelude::*;
//!
//! # fn main() -> Result<(), PhysicsError> {
//! let mut world = World::default();
//!
//! // A static floor
//! world.create_body(
//!     RigidBodyDesc::fixed()
//!         .with_collider(Collider::new(Shape::aabb(Vec3::new(10.0, 0.5, 10.0)))?),
//! )?;
//!
//! // A falling box
//! let crate_box = world.create_body(
//!     RigidBodyDesc::dynamic()
//!         .with_position(Vec3::new(0.0, 5.0, 0.0))
//!         .with_mass(1.0)
//!         .with_collider(Collider::new(Shape::obb(Vec3::splat(0.5)))?),
//! )?;
//!
//! for _ in 0..120 {
//!     world.step(1.0 / 60.0)?;
//! }
//! let y = world.body(crate_box).map(|b| b.position.y);
//! assert!(y.is_some_and(|y| y < 5.0));
//! # Ok(())
//! # }
//! ```
//!
//! Logging goes through [`tracing`]; install a subscriber to see it.

pub mod collision;
pub mod config;
pub mod constraints;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod solver;
mod world;

pub use config::WorldConfig;
pub use error::{PhysicsError, PhysicsResult};
pub use world::{ColliderDebug, StepStats, World};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{BodyHandle, CollisionManifold, Contact};
    pub use crate::config::WorldConfig;
    pub use crate::constraints::{Constraint, DistanceConstraint};
    pub use crate::dynamics::{RigidBody, RigidBodyDesc, RigidBodyState};
    pub use crate::error::{PhysicsError, PhysicsResult};
    pub use crate::geometry::{Aabb, Collider, ColliderShape, Shape, ShapeKind};
    pub use crate::math::{Mat3, Pose, Quat, Vec3};
    pub use crate::solver::ResolverConfig;
    pub use crate::world::{ColliderDebug, StepStats, World};
}
