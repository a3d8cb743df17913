pub mod contact;
pub mod legacy;
pub mod narrow_phase;

pub use contact::{BodyHandle, CollisionManifold, CollisionPair, Contact, CONTACT_MERGE_DISTANCE};
pub use legacy::CollisionResult;
pub use narrow_phase::collide;
