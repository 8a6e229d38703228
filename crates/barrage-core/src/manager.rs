//! Projectile lifecycle: spawning, per-tick advancement, and despawning.
//!
//! ## Architecture
//!
//! [`ProjectileManager`] owns the pool, the spatial grid, and the per-faction
//! index, and keeps all three consistent through every mutation. A tick runs
//! in two phases:
//!
//! 1. **Integrate** (parallel): every live projectile computes its next
//!    position and velocity from immutable state, fanned out with `rayon`.
//! 2. **Apply** (sequential): outcomes are written back in slot order, the
//!    grid is re-indexed, and lifetime/bounds violations queue the
//!    projectile for removal.
//!
//! Removal is two-stage on purpose. Retiring a projectile removes it from
//! the grid and the faction index immediately, so queries stop returning it
//! the moment it dies, but the pool slot stays occupied until the pending
//! flush at the end of the collision pass. Collision bookkeeping in the
//! same tick therefore never dereferences a recycled slot.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use lattice::{GridStats, SpatialHashGrid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::{DespawnReason, SimEvent};
use crate::hooks::TargetLookup;
use crate::motion::{self, StepOutcome};
use crate::pool::ProjectilePool;
use crate::projectile::{MotionKind, Projectile, ProjectileId, ProjectileTypeId};
use crate::registry::ProjectileTypeRegistry;
use crate::stats::ManagerStats;
use crate::unit::{FactionId, UnitId};

/// Sizing and world-extent settings for a [`ProjectileManager`].
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Maximum simultaneous projectiles.
    pub capacity: usize,
    /// Spatial grid cell edge length.
    pub cell_size: f32,
    /// Projectiles farther than this from the origin despawn.
    pub world_bound: f32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            cell_size: 32.0,
            world_bound: 4_000.0,
        }
    }
}

impl ManagerConfig {
    /// Sets the pool capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the grid cell size.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the world boundary radius.
    #[must_use]
    pub const fn with_world_bound(mut self, world_bound: f32) -> Self {
        self.world_bound = world_bound;
        self
    }
}

/// Snapshot of a resolved hit, handed to the collision system.
#[derive(Debug, Clone)]
pub(crate) struct HitRecord {
    pub faction: FactionId,
    pub damage: f32,
    pub position: Vec3,
    pub type_id: ProjectileTypeId,
    pub despawn: bool,
}

/// Owns every projectile in flight.
#[derive(Debug)]
pub struct ProjectileManager {
    config: ManagerConfig,
    types: ProjectileTypeRegistry,
    pool: ProjectilePool,
    grid: SpatialHashGrid<ProjectileId>,
    by_faction: BTreeMap<FactionId, BTreeSet<ProjectileId>>,
    pending_despawn: Vec<(ProjectileId, DespawnReason)>,
    events: Vec<SimEvent>,
    steps: Vec<Option<StepOutcome>>,
    stats: ManagerStats,
    tick: u64,
}

impl ProjectileManager {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a manager with the given settings and type table.
    ///
    /// # Panics
    ///
    /// Panics if `config.cell_size` or `config.world_bound` is not strictly
    /// positive.
    #[must_use]
    pub fn new(config: ManagerConfig, types: ProjectileTypeRegistry) -> Self {
        assert!(
            config.world_bound > 0.0,
            "world bound must be positive, got {}",
            config.world_bound
        );
        Self {
            grid: SpatialHashGrid::new(config.cell_size),
            pool: ProjectilePool::new(config.capacity),
            types,
            config,
            by_faction: BTreeMap::new(),
            pending_despawn: Vec::new(),
            events: Vec::new(),
            steps: Vec::new(),
            stats: ManagerStats::default(),
            tick: 0,
        }
    }

    /// Creates a manager with default settings and the built-in type table.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ManagerConfig::default(), ProjectileTypeRegistry::with_defaults())
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawns a projectile flying along `direction` from `position`.
    ///
    /// `direction` is normalized internally; speed always comes from the
    /// type record. `target` is kept only for homing types. Returns `None`
    /// without side effects when the type is unknown, the direction is
    /// degenerate (zero, or too small to normalize), or the pool is
    /// exhausted.
    pub fn spawn(
        &mut self,
        faction: FactionId,
        type_id: &str,
        position: Vec3,
        direction: Vec3,
        target: Option<UnitId>,
    ) -> Option<ProjectileId> {
        let Some(ty) = self.types.get(type_id).cloned() else {
            debug!("spawn refused: unknown projectile type {}", type_id);
            self.stats.refused += 1;
            return None;
        };
        let Some(direction) = direction.try_normalize() else {
            debug!("spawn refused: degenerate direction for {}", type_id);
            self.stats.refused += 1;
            return None;
        };
        let Some(id) = self.pool.acquire() else {
            debug!("spawn refused: pool exhausted at {} live", self.pool.live());
            self.stats.refused += 1;
            return None;
        };

        let velocity = direction * ty.speed;
        let target = if ty.motion == MotionKind::Homing {
            target
        } else {
            None
        };
        if let Some(projectile) = self.pool.get_mut(id) {
            projectile.initialize(faction, &ty, position, velocity, target, self.tick);
        }
        self.grid.insert(id, position);
        self.by_faction.entry(faction).or_default().insert(id);
        self.events.push(SimEvent::ProjectileSpawned {
            id,
            faction,
            tick: self.tick,
        });
        self.stats.spawned += 1;
        self.stats.live = self.pool.live();
        self.stats.live_peak = self.stats.live_peak.max(self.stats.live);
        Some(id)
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advances every live projectile by `delta` seconds.
    ///
    /// Expired and out-of-bounds projectiles vanish from spatial and faction
    /// queries immediately but hold their pool slot until the end of the
    /// collision pass (or the start of the next `advance`, whichever comes
    /// first).
    pub fn advance(&mut self, delta: f32, targets: &dyn TargetLookup) {
        if delta <= 0.0 {
            warn!("ignoring tick with non-positive delta {}", delta);
            return;
        }
        self.flush_pending();
        self.tick += 1;

        // Integration phase: pure reads, data-parallel across slots.
        let mut steps = std::mem::take(&mut self.steps);
        {
            let types = &self.types;
            self.pool
                .slots()
                .par_iter()
                .map(|projectile| {
                    projectile
                        .is_active()
                        .then(|| motion::step(projectile, types, delta, targets))
                })
                .collect_into_vec(&mut steps);
        }

        // Apply phase: sequential write-back in slot order.
        let bound_sq = self.config.world_bound * self.config.world_bound;
        for (index, step) in steps.iter().enumerate() {
            let Some(step) = step else { continue };
            // Pool construction caps capacity at u32::MAX.
            #[allow(clippy::cast_possible_truncation)]
            let index = index as u32;
            let Some(projectile) = self.pool.slot_mut(index) else {
                continue;
            };
            projectile.position = step.position;
            projectile.velocity = step.velocity;
            if step.target_lost && projectile.target.is_some() {
                projectile.target = None;
                debug!("projectile {} lost its homing target", projectile.id());
            }
            projectile.lifetime -= delta;

            let id = projectile.id();
            let position = projectile.position;
            let lifetime = projectile.lifetime;
            if lifetime <= 0.0 {
                self.retire(id, DespawnReason::Expired);
            } else if position.length_squared() > bound_sq {
                self.retire(id, DespawnReason::OutOfBounds);
            } else {
                self.grid.update(id, position);
            }
        }
        self.steps = steps;
    }

    // =========================================================================
    // Despawning
    // =========================================================================

    /// Removes a projectile from queries now; the slot is reclaimed at the
    /// next `flush_pending`.
    pub(crate) fn retire(&mut self, id: ProjectileId, reason: DespawnReason) {
        let Some(projectile) = self.pool.get(id) else {
            return;
        };
        let faction = projectile.faction;
        self.grid.remove(id);
        if let Some(set) = self.by_faction.get_mut(&faction) {
            set.remove(&id);
            if set.is_empty() {
                self.by_faction.remove(&faction);
            }
        }
        self.pending_despawn.push((id, reason));
    }

    /// Reclaims every retired slot, emitting despawn events in retirement
    /// order.
    pub(crate) fn flush_pending(&mut self) {
        if !self.pending_despawn.is_empty() {
            let mut pending = std::mem::take(&mut self.pending_despawn);
            for (id, reason) in pending.drain(..) {
                self.finish_despawn(id, reason);
            }
            self.pending_despawn = pending;
        }
        // Every live slot is indexed once nothing is pending.
        debug_assert_eq!(self.grid.len(), self.pool.live());
    }

    fn finish_despawn(&mut self, id: ProjectileId, reason: DespawnReason) -> bool {
        let Some(projectile) = self.pool.get(id) else {
            return false;
        };
        let faction = projectile.faction;
        self.grid.remove(id);
        if let Some(set) = self.by_faction.get_mut(&faction) {
            set.remove(&id);
            if set.is_empty() {
                self.by_faction.remove(&faction);
            }
        }
        if !self.pool.release(id) {
            return false;
        }
        debug!("projectile {} despawned: {:?}", id, reason);
        self.stats.despawned += 1;
        self.stats.live = self.pool.live();
        self.events.push(SimEvent::ProjectileDespawned {
            id,
            reason,
            tick: self.tick,
        });
        true
    }

    /// Despawns a projectile immediately, reclaiming its slot.
    ///
    /// Returns `false` for stale or already-despawned handles. Requires
    /// `&mut self`, so it can never interleave with a running tick.
    pub fn despawn(&mut self, id: ProjectileId) -> bool {
        self.finish_despawn(id, DespawnReason::Forced)
    }

    /// Records a hit by `id` against `unit`.
    ///
    /// Returns `None` when the projectile is gone or already hit this unit.
    /// A hit that spends the pierce budget retires the projectile.
    pub(crate) fn register_hit(&mut self, id: ProjectileId, unit: UnitId) -> Option<HitRecord> {
        let projectile = self.pool.get_mut(id)?;
        let despawn = projectile.register_hit(unit)?;
        let record = HitRecord {
            faction: projectile.faction,
            damage: projectile.damage,
            position: projectile.position,
            type_id: projectile.type_id.clone(),
            despawn,
        };
        if despawn {
            self.retire(id, DespawnReason::Impact);
        }
        Some(record)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Live projectiles within `radius` of `center`, sorted by id.
    #[must_use]
    pub fn projectiles_in_radius(&self, center: Vec3, radius: f32) -> Vec<ProjectileId> {
        self.grid.query_radius(center, radius)
    }

    /// Live projectiles owned by `faction`, sorted by id.
    #[must_use]
    pub fn projectiles_by_faction(&self, faction: FactionId) -> Vec<ProjectileId> {
        self.by_faction
            .get(&faction)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Read access to a live projectile.
    #[must_use]
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.pool.get(id)
    }

    /// Whether a handle still points at a live projectile.
    #[must_use]
    pub fn is_active(&self, id: ProjectileId) -> bool {
        self.pool.get(id).is_some()
    }

    /// Drains the accumulated lifecycle events in emission order.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The projectile type table.
    #[must_use]
    pub const fn types(&self) -> &ProjectileTypeRegistry {
        &self.types
    }

    /// Mutable access to the type table, for live tuning.
    pub fn types_mut(&mut self) -> &mut ProjectileTypeRegistry {
        &mut self.types
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Live projectile count.
    #[must_use]
    pub fn live(&self) -> usize {
        self.pool.live()
    }

    /// Pool capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Lifecycle counters.
    #[must_use]
    pub const fn stats(&self) -> &ManagerStats {
        &self.stats
    }

    /// Occupancy of the projectile grid.
    #[must_use]
    pub fn grid_stats(&self) -> GridStats {
        self.grid.stats()
    }

    pub(crate) fn slot_count(&self) -> u32 {
        // Pool construction caps capacity at u32::MAX.
        #[allow(clippy::cast_possible_truncation)]
        let count = self.pool.capacity() as u32;
        count
    }

    pub(crate) fn projectile_at(&self, slot: u32) -> Option<&Projectile> {
        self.pool.slot(slot)
    }
}

// =============================================================================
// Tests
// =============================================================================
