//! Joints solved after contacts each step.

mod distance;

pub use distance::DistanceConstraint;

use std::fmt::Debug;

use crate::collision::BodyHandle;
use crate::dynamics::BodySet;

/// A constraint between bodies, solved by moving them directly
pub trait Constraint: Debug + Send + Sync {
    /// The two bodies this constraint connects
    fn bodies(&self) -> (BodyHandle, BodyHandle);

    /// One solver pass. Missing bodies make this a no-op.
    fn solve(&self, bodies: &mut BodySet, dt: f32);
}
