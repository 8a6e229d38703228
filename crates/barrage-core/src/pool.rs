//! Fixed-capacity projectile pool.
//!
//! All projectile storage is allocated up front as a flat slab. A free list
//! hands out vacant slots in LIFO order; releasing a slot scrubs it and
//! advances its generation so stale [`ProjectileId`] handles can never reach
//! the slot's next tenant. Steady-state spawn and despawn perform no heap
//! allocation.

use serde::{Deserialize, Serialize};

use crate::projectile::{Projectile, ProjectileId};

/// Pre-allocated slab of projectile slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    free: Vec<u32>,
    live: usize,
}

impl ProjectilePool {
    /// Allocates a pool with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity_u32 =
            u32::try_from(capacity).unwrap_or_else(|_| panic!("pool capacity {capacity} too large"));
        // Reversed so slots are issued in ascending index order.
        let free: Vec<u32> = (0..capacity_u32).rev().collect();
        let slots = (0..capacity_u32).map(Projectile::new).collect();
        Self {
            slots,
            free,
            live: 0,
        }
    }

    /// Claims a vacant slot, or `None` when the pool is exhausted.
    ///
    /// The returned projectile is active but blank; the caller fills it in.
    pub fn acquire(&mut self) -> Option<ProjectileId> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.mark_active();
        self.live += 1;
        Some(slot.id())
    }

    /// Returns a slot to the pool.
    ///
    /// Scrubs the slot, advances its generation, and pushes it back on the
    /// free list. Stale or already-released handles are refused (`false`),
    /// which makes double release harmless.
    pub fn release(&mut self, id: ProjectileId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return false;
        };
        if !slot.is_active() || slot.id() != id {
            return false;
        }
        slot.reset();
        slot.advance_generation();
        self.free.push(id.index());
        self.live -= 1;
        true
    }

    /// Live projectile behind a handle, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.is_active() && slot.id() == id)
    }

    /// Mutable access behind a handle, with the same staleness check.
    pub fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.is_active() && slot.id() == id)
    }

    /// Live projectile by slot index, ignoring generation.
    pub(crate) fn slot(&self, index: u32) -> Option<&Projectile> {
        self.slots
            .get(index as usize)
            .filter(|slot| slot.is_active())
    }

    /// Mutable slot access by index, active slots only.
    pub(crate) fn slot_mut(&mut self, index: u32) -> Option<&mut Projectile> {
        self.slots
            .get_mut(index as usize)
            .filter(|slot| slot.is_active())
    }

    /// The whole slab, vacant slots included. Callers filter on
    /// [`Projectile::is_active`].
    pub(crate) fn slots(&self) -> &[Projectile] {
        &self.slots
    }

    /// Total slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live projectiles.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Number of vacant slots.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Whether every slot is taken.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Iterates live projectiles in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|slot| slot.is_active())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn acquire_issues_slots_in_ascending_order() {
        let mut pool = ProjectilePool::new(3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(c.index(), 2);
        assert_eq!(pool.live(), 3);
    }

    #[test]
    fn exhausted_pool_refuses_until_a_release() {
        let mut pool = ProjectilePool::new(2);
        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();

        assert!(pool.is_exhausted());
        assert!(pool.acquire().is_none());

        assert!(pool.release(a));
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn release_bumps_the_generation() {
        let mut pool = ProjectilePool::new(1);
        let first = pool.acquire().unwrap();
        assert_eq!(first.generation(), 0);

        assert!(pool.release(first));
        let second = pool.acquire().unwrap();
        assert_eq!(second.index(), first.index());
        assert_eq!(second.generation(), 1);
    }

    #[test]
    fn stale_handles_cannot_reach_the_new_tenant() {
        let mut pool = ProjectilePool::new(1);
        let old = pool.acquire().unwrap();
        pool.release(old);
        let new = pool.acquire().unwrap();

        assert!(pool.get(old).is_none());
        assert!(pool.get_mut(old).is_none());
        assert!(!pool.release(old));
        assert!(pool.get(new).is_some());
        assert_eq!(pool.live(), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut pool = ProjectilePool::new(2);
        let a = pool.acquire().unwrap();

        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn out_of_range_handles_are_refused() {
        let mut pool = ProjectilePool::new(1);
        let bogus = ProjectileId::new(40, 0);
        assert!(pool.get(bogus).is_none());
        assert!(!pool.release(bogus));
    }

    #[test]
    fn slot_access_skips_vacant_slots() {
        let mut pool = ProjectilePool::new(2);
        let a = pool.acquire().unwrap();

        assert!(pool.slot(a.index()).is_some());
        assert!(pool.slot(1).is_none());

        pool.release(a);
        assert!(pool.slot(a.index()).is_none());
    }

    #[test]
    fn iter_active_walks_slot_order() {
        let mut pool = ProjectilePool::new(4);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();
        pool.release(b);

        let indices: Vec<u32> = pool.iter_active().map(|p| p.id().index()).collect();
        assert_eq!(indices, vec![a.index(), c.index()]);
    }

    proptest! {
        #[test]
        fn prop_live_and_free_always_partition_capacity(
            ops in proptest::collection::vec((0u8..2, 0usize..64), 1..200)
        ) {
            let mut pool = ProjectilePool::new(8);
            let mut issued: Vec<ProjectileId> = Vec::new();

            for (op, pick) in ops {
                if op == 0 {
                    if let Some(id) = pool.acquire() {
                        issued.push(id);
                    }
                } else if !issued.is_empty() {
                    let id = issued.swap_remove(pick % issued.len());
                    prop_assert!(pool.release(id));
                }
                prop_assert!(pool.live() <= pool.capacity());
                prop_assert_eq!(pool.live() + pool.available(), pool.capacity());
                prop_assert_eq!(pool.live(), issued.len());
            }

            for id in issued {
                prop_assert!(pool.release(id));
            }
            prop_assert_eq!(pool.live(), 0);
        }
    }
}
