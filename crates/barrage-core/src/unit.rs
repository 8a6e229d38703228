//! Unit-side contract: opaque identifiers and the caller-owned unit index.
//!
//! The projectile core never owns unit data. The owning game systems publish
//! `(id, position, radius, faction)` tuples into a [`UnitIndex`] through
//! `register`/`update_position`/`remove` and pass the index into each tick by
//! shared reference; the core only reads it.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use lattice::SpatialHashGrid;
use serde::{Deserialize, Serialize};

use crate::hooks::TargetLookup;

/// Opaque identifier for a game unit.
///
/// Issued by the owning game's unit registry; the core only stores and
/// compares these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u64);

impl UnitId {
    /// Creates a unit id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for UnitId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque faction identifier (team ownership).
///
/// Projectiles never collide with units of their own faction.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FactionId(u32);

impl FactionId {
    /// Creates a faction id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for FactionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position, size, and allegiance of one registered unit.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBody {
    /// World position (center)
    pub position: Vec3,
    /// Collision radius
    pub radius: f32,
    /// Owning faction
    pub faction: FactionId,
}

/// Broad-phase index over the units projectiles can hit.
///
/// Wraps a spatial hash grid plus per-unit bodies, kept in lockstep: every
/// publication call updates both. The index also tracks the largest radius
/// ever registered (a high-water mark), which collision queries use to size
/// their candidate window so a big unit is never missed just because its
/// center sits outside a naive query radius.
#[derive(Debug, Clone)]
pub struct UnitIndex {
    grid: SpatialHashGrid<UnitId>,
    units: BTreeMap<UnitId, UnitBody>,
    max_radius: f32,
}

impl UnitIndex {
    /// Creates an empty index with the given grid cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialHashGrid::new(cell_size),
            units: BTreeMap::new(),
            max_radius: 0.0,
        }
    }

    // =========================================================================
    // Publication (the unit-side contract)
    // =========================================================================

    /// Registers a unit, replacing any previous body under the same id.
    pub fn register(&mut self, id: UnitId, body: UnitBody) {
        self.grid.insert(id, body.position);
        self.max_radius = self.max_radius.max(body.radius);
        self.units.insert(id, body);
    }

    /// Moves a registered unit. Returns `false` for unknown ids.
    pub fn update_position(&mut self, id: UnitId, position: Vec3) -> bool {
        match self.units.get_mut(&id) {
            Some(body) => {
                body.position = position;
                self.grid.update(id, position);
                true
            }
            None => false,
        }
    }

    /// Removes a unit. Removing an absent id is a no-op (`false`).
    ///
    /// The radius high-water mark is deliberately not lowered; staying
    /// conservative keeps in-flight candidate windows valid.
    pub fn remove(&mut self, id: UnitId) -> bool {
        let removed = self.units.remove(&id).is_some();
        if removed {
            self.grid.remove(id);
        }
        removed
    }

    /// Drops every unit.
    pub fn clear(&mut self) {
        self.units.clear();
        self.grid.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Body of a registered unit.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitBody> {
        self.units.get(&id)
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Largest radius ever registered.
    #[must_use]
    pub const fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Units whose centers lie within `radius` of `center`, sorted by id.
    #[must_use]
    pub fn units_in_radius(&self, center: Vec3, radius: f32) -> Vec<UnitId> {
        self.grid.query_radius(center, radius)
    }

    /// Iterates all units in id order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &UnitBody)> {
        self.units.iter().map(|(id, body)| (*id, body))
    }
}

impl TargetLookup for UnitIndex {
    fn target_position(&self, target: UnitId) -> Option<Vec3> {
        self.units.get(&target).map(|body| body.position)
    }
}

// =============================================================================
// Tests
// =============================================================================
