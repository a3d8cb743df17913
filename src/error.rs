//! Error type shared by the whole crate.
//!
//! Geometry and integration errors are not recoverable mid-step: when
//! [`World::step`](crate::World::step) returns an error the caller should fix the
//! offending body or collider before stepping again.

use thiserror::Error;

use crate::collision::BodyHandle;
use crate::geometry::ShapeKind;

/// Result alias used across the crate
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Physics core failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// No narrow-phase test exists for this pair of shapes
    #[error("collision between {a:?} and {b:?} is not implemented")]
    UnsupportedPair {
        /// Shape kind of the first collider
        a: ShapeKind,
        /// Shape kind of the second collider
        b: ShapeKind,
    },

    /// Mass must be zero (static) or positive
    #[error("mass must be >= 0, got {0}")]
    NegativeMass(f32),

    /// Mass was NaN or infinite
    #[error("mass must be finite, got {0}")]
    NonFiniteMass(f32),

    /// A body reached the integrator or the world step with no collider attached
    #[error("body {0:?} has no collider attached")]
    MissingCollider(BodyHandle),

    /// Handle does not refer to a live body
    #[error("body {0:?} does not exist")]
    InvalidBody(BodyHandle),

    /// Time step was negative, NaN or infinite
    #[error("time step must be finite and >= 0, got {0}")]
    InvalidTimeStep(f32),

    /// Shape dimensions were unusable
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Body snapshot was written by a different layout version
    #[error("body state version {found} does not match expected {expected}")]
    StateVersion {
        /// Version stored in the snapshot
        found: u32,
        /// Version this build understands
        expected: u32,
    },

    /// World configuration failed validation
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
}
