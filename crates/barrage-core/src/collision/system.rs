//! Tick-level collision resolution and area damage.
//!
//! [`ProjectileCollisionSystem`] walks live projectiles in slot order, asks
//! the detector for a contact, and dispatches confirmed hits to the caller's
//! damage and effect sinks. Each projectile lands at most one hit per tick;
//! piercing projectiles continue and pick up their next victim on a later
//! tick. An optional wall-clock budget degrades overload gracefully by
//! skipping the tail of the pass rather than stretching the frame.

use std::time::{Duration, Instant};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::collision::detector::{units_in_radius_excluding, CollisionDetector};
use crate::hooks::{DamageSink, EffectSink};
use crate::manager::ProjectileManager;
use crate::projectile::ProjectileId;
use crate::stats::CombatStats;
use crate::unit::{FactionId, UnitId, UnitIndex};

/// One resolved hit from a collision pass.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    /// Projectile that landed the hit.
    pub projectile: ProjectileId,
    /// Faction credited with the damage.
    pub faction: FactionId,
    /// Unit that was struck.
    pub target: UnitId,
    /// Damage dispatched to the sink.
    pub damage: f32,
    /// Projectile position at resolution.
    pub position: Vec3,
    /// Whether the hit spent the projectile's pierce budget.
    pub despawned: bool,
}

/// Resolves projectile-unit collisions once per tick.
#[derive(Debug)]
pub struct ProjectileCollisionSystem {
    detector: CollisionDetector,
    stats: CombatStats,
    tick_budget: Option<Duration>,
}

impl Default for ProjectileCollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileCollisionSystem {
    /// Creates a system with a default detector and no tick budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            detector: CollisionDetector::new(),
            stats: CombatStats::default(),
            tick_budget: None,
        }
    }

    /// Replaces the detector.
    #[must_use]
    pub const fn with_detector(mut self, detector: CollisionDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Caps the wall-clock time of one collision pass.
    ///
    /// When the budget runs out the remaining projectiles are skipped for
    /// the tick (and counted in the stats); movement is never affected.
    #[must_use]
    pub const fn with_tick_budget(mut self, budget: Duration) -> Self {
        self.tick_budget = Some(budget);
        self
    }

    /// Combat counters.
    #[must_use]
    pub const fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Resolves this tick's collisions, dispatching damage and effects.
    ///
    /// Projectiles are visited in slot order. The pass ends by flushing the
    /// manager's retired projectiles, so spent slots are reusable as soon as
    /// this returns.
    pub fn process_collisions(
        &mut self,
        manager: &mut ProjectileManager,
        units: &UnitIndex,
        damage: &mut dyn DamageSink,
        effects: &mut dyn EffectSink,
    ) -> Vec<CollisionResult> {
        self.stats.begin_tick();
        let started = Instant::now();
        let mut results = Vec::new();

        for slot in 0..manager.slot_count() {
            if let Some(budget) = self.tick_budget {
                if started.elapsed() >= budget {
                    let skipped = count_active_from(manager, slot);
                    self.stats.record_truncated(skipped);
                    warn!(
                        "collision pass out of budget, {} projectiles unchecked",
                        skipped
                    );
                    break;
                }
            }
            let Some(projectile) = manager.projectile_at(slot) else {
                continue;
            };
            let Some(contact) = self.detector.detect(projectile, units) else {
                continue;
            };
            let id = projectile.id();
            let Some(hit) = manager.register_hit(id, contact.unit) else {
                continue;
            };

            damage.apply_damage(contact.unit, hit.damage, hit.faction);
            if let Some(effect) = manager
                .types()
                .get(hit.type_id.as_str())
                .and_then(|ty| ty.effect.as_ref())
            {
                effects.trigger_effect(effect, hit.position);
            }
            self.stats.record_hit(hit.damage);
            results.push(CollisionResult {
                projectile: id,
                faction: hit.faction,
                target: contact.unit,
                damage: hit.damage,
                position: hit.position,
                despawned: hit.despawn,
            });
        }

        manager.flush_pending();
        results
    }

    /// Applies damage to every unit within `radius` of `center`.
    ///
    /// Units of the attacker's own faction are spared. With `falloff`,
    /// damage scales linearly from full at the center to zero at the
    /// radius. Returns the affected units sorted by id.
    pub fn apply_area_damage(
        &mut self,
        units: &UnitIndex,
        center: Vec3,
        radius: f32,
        damage: f32,
        attacker: FactionId,
        falloff: bool,
        sink: &mut dyn DamageSink,
    ) -> Vec<UnitId> {
        if radius <= 0.0 {
            return Vec::new();
        }
        let mut casualties = Vec::new();
        for (unit, distance) in units_in_radius_excluding(units, center, radius, Some(attacker)) {
            let amount = if falloff {
                damage * (1.0 - distance / radius).max(0.0)
            } else {
                damage
            };
            sink.apply_damage(unit, amount, attacker);
            self.stats.record_area_casualty();
            casualties.push(unit);
        }
        casualties
    }
}

fn count_active_from(manager: &ProjectileManager, from: u32) -> u32 {
    let count = (from..manager.slot_count())
        .filter(|slot| manager.projectile_at(*slot).is_some())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

// =============================================================================
// Tests
// =============================================================================
