mod body_set;
mod integrator;
mod rigid_body;

pub use body_set::BodySet;
pub use integrator::{damping_factor, rk4_linear, rk4_orientation};
pub use rigid_body::{RigidBody, RigidBodyDesc, RigidBodyState, DEFAULT_DAMPING, STATE_VERSION};
