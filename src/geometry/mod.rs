mod aabb;
mod collider;
mod shape;

pub use aabb::Aabb;
pub use collider::{Collider, DEFAULT_RESTITUTION};
pub use shape::{
    box_corners, box_inertia, AabbShape, BoxShape, ColliderShape, ConvexHull, ObbShape, Shape,
    ShapeKind, Sphere,
};
