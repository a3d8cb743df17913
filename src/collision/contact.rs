use crate::math::Vec3;

/// Contact candidates closer than this are treated as the same point
pub const CONTACT_MERGE_DISTANCE: f32 = 1e-4;

/// A handle to a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    /// Handle of a body that is not in a world yet
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates a new body handle
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the slot index of this handle
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Result of one narrow-phase test.
///
/// When `colliding` is true the normal is unit length and points from the
/// second shape toward the first, `depth >= 0`, and `contacts` holds at least
/// one world-space point inside the overlap. When it is false the other fields
/// carry no information.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollisionManifold {
    pub colliding: bool,
    pub normal: Vec3,
    pub depth: f32,
    pub contacts: Vec<Vec3>,
}

impl CollisionManifold {
    /// The non-colliding result
    #[inline]
    pub fn separated() -> Self {
        Self::default()
    }

    /// A colliding result. The normal is normalized here; contacts closer than
    /// [`CONTACT_MERGE_DISTANCE`] are merged.
    pub fn touching(normal: Vec3, depth: f32, contacts: impl IntoIterator<Item = Vec3>) -> Self {
        let mut manifold = Self {
            colliding: true,
            normal: normal.normalize(),
            depth: depth.max(0.0),
            contacts: Vec::new(),
        };
        for point in contacts {
            manifold.add_contact(point);
        }
        manifold
    }

    #[inline]
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// Adds a contact point unless an equivalent one is already present
    pub fn add_contact(&mut self, point: Vec3) {
        let merge_sq = CONTACT_MERGE_DISTANCE * CONTACT_MERGE_DISTANCE;
        if self
            .contacts
            .iter()
            .all(|existing| existing.distance_squared(point) > merge_sq)
        {
            self.contacts.push(point);
        }
    }

    /// The same manifold seen from the other shape: the normal is negated
    #[inline]
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }

    /// Average of the contact points, if any
    pub fn centroid(&self) -> Option<Vec3> {
        if self.contacts.is_empty() {
            return None;
        }
        let sum = self.contacts.iter().fold(Vec3::ZERO, |acc, &p| acc + p);
        Some(sum / self.contacts.len() as f32)
    }
}

/// A collision pair identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// First body (always has smaller handle)
    pub body_a: BodyHandle,
    /// Second body (always has larger handle)
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Creates a new collision pair, ensuring consistent ordering
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a.0 <= b.0 {
            Self { body_a: a, body_b: b }
        } else {
            Self { body_a: b, body_b: a }
        }
    }
}

/// A colliding pair found during a world step, handed to the resolver.
///
/// The manifold normal points from `pair.body_b` toward `pair.body_a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub pair: CollisionPair,
    pub manifold: CollisionManifold,
    /// Combined restitution of the two colliders
    pub restitution: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separated_carries_nothing() {
        let m = CollisionManifold::separated();
        assert!(!m.is_colliding());
        assert_eq!(m.depth, 0.0);
        assert!(m.contacts.is_empty());
        assert!(m.centroid().is_none());
    }

    #[test]
    fn test_touching_normalizes_and_dedups() {
        let m = CollisionManifold::touching(
            Vec3::new(0.0, 2.0, 0.0),
            0.25,
            [Vec3::ZERO, Vec3::splat(1e-6), Vec3::X],
        );
        assert!(m.is_colliding());
        assert_eq!(m.normal, Vec3::Y);
        assert_eq!(m.contacts.len(), 2);
        assert_eq!(m.centroid(), Some(Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_flipped_negates_normal_only() {
        let m = CollisionManifold::touching(Vec3::X, 0.5, [Vec3::ZERO]);
        let f = m.clone().flipped();
        assert_eq!(f.normal, -Vec3::X);
        assert_eq!(f.depth, m.depth);
        assert_eq!(f.contacts, m.contacts);
    }

    #[test]
    fn test_collision_pair_ordering() {
        let pair1 = CollisionPair::new(BodyHandle::new(1), BodyHandle::new(2));
        let pair2 = CollisionPair::new(BodyHandle::new(2), BodyHandle::new(1));

        assert_eq!(pair1, pair2);
        assert_eq!(pair1.body_a.0, 1);
        assert_eq!(pair1.body_b.0, 2);
    }
}
