//! Shared fixtures for the crate-level tests.

use glam::Vec3;

use crate::hooks::{DamageSink, EffectSink};
use crate::manager::{ManagerConfig, ProjectileManager};
use crate::projectile::EffectTag;
use crate::registry::ProjectileTypeRegistry;
use crate::unit::{FactionId, UnitBody, UnitId, UnitIndex};

// =============================================================================
// Managers
// =============================================================================

/// Manager with default settings and the built-in type table.
pub fn default_manager() -> ProjectileManager {
    ProjectileManager::with_defaults()
}

/// Manager with a custom pool capacity, everything else default.
pub fn bounded_manager(capacity: usize) -> ProjectileManager {
    ProjectileManager::new(
        ManagerConfig::default().with_capacity(capacity),
        ProjectileTypeRegistry::with_defaults(),
    )
}

// =============================================================================
// Units
// =============================================================================

/// Registers one unit.
pub fn place_unit(units: &mut UnitIndex, id: u64, position: Vec3, radius: f32, faction: u32) {
    units.register(
        UnitId::new(id),
        UnitBody {
            position,
            radius,
            faction: FactionId::new(faction),
        },
    );
}

/// Registers `count` units in a line from `start`, stepping by `step`.
#[allow(clippy::cast_precision_loss)]
pub fn place_unit_line(
    units: &mut UnitIndex,
    first_id: u64,
    start: Vec3,
    step: Vec3,
    count: u64,
    radius: f32,
    faction: u32,
) -> Vec<UnitId> {
    (0..count)
        .map(|i| {
            let id = UnitId::new(first_id + i);
            units.register(
                id,
                UnitBody {
                    position: start + step * i as f32,
                    radius,
                    faction: FactionId::new(faction),
                },
            );
            id
        })
        .collect()
}

// =============================================================================
// Sinks
// =============================================================================

/// Damage sink that records every dispatch.
#[derive(Debug, Default)]
pub struct DamageLog {
    pub hits: Vec<(UnitId, f32, FactionId)>,
}

impl DamageLog {
    /// Total damage dispatched so far.
    pub fn total(&self) -> f32 {
        self.hits.iter().map(|(_, amount, _)| amount).sum()
    }

    /// Total damage a single unit has taken.
    pub fn for_unit(&self, unit: UnitId) -> f32 {
        self.hits
            .iter()
            .filter(|(target, _, _)| *target == unit)
            .map(|(_, amount, _)| amount)
            .sum()
    }
}

impl DamageSink for DamageLog {
    fn apply_damage(&mut self, target: UnitId, amount: f32, attacker: FactionId) {
        self.hits.push((target, amount, attacker));
    }
}

/// Effect sink that records every trigger.
#[derive(Debug, Default)]
pub struct EffectLog {
    pub fired: Vec<(String, Vec3)>,
}

impl EffectSink for EffectLog {
    fn trigger_effect(&mut self, effect: &EffectTag, position: Vec3) {
        self.fired.push((effect.as_str().to_owned(), position));
    }
}
