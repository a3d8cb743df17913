use crate::collision::BodyHandle;

use super::rigid_body::RigidBody;

/// Slot storage for bodies. Removed slots are reused by later inserts, so a
/// handle stays valid until its body is removed.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    slots: Vec<Option<RigidBody>>,
    free: Vec<usize>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the body and returns its handle
    pub fn insert(&mut self, mut body: RigidBody) -> BodyHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let handle = BodyHandle::new(index as u32);
        body.set_handle(handle);
        self.slots[index] = Some(body);
        handle
    }

    /// Takes the body out of its slot
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let mut body = self.slots.get_mut(handle.index())?.take()?;
        self.free.push(handle.index());
        body.set_handle(BodyHandle::INVALID);
        Some(body)
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots.get(handle.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots.get_mut(handle.index())?.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Mutable access to two different bodies at once
    pub fn get_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= self.slots.len() || ib >= self.slots.len() {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            Some((lo[ia].as_mut()?, hi[0].as_mut()?))
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            Some((hi[0].as_mut()?, lo[ib].as_mut()?))
        }
    }

    /// Number of live bodies
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles in slot order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.iter().map(|body| body.handle())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RigidBody> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RigidBody> {
        self.slots.iter_mut().flatten()
    }
}
