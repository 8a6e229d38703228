//! Running counters for profiling and balance tuning.

use serde::{Deserialize, Serialize};

/// Lifecycle counters kept by the projectile manager.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct ManagerStats {
    /// Projectiles successfully spawned.
    pub spawned: u64,
    /// Spawn requests refused (unknown type, bad direction, pool full).
    pub refused: u64,
    /// Projectiles removed for any reason.
    pub despawned: u64,
    /// Live projectiles right now.
    pub live: usize,
    /// Most projectiles ever live at once.
    pub live_peak: usize,
}

/// Combat counters kept by the collision system.
///
/// The `*_this_tick` fields reset at the start of every collision pass; the
/// totals accumulate for the life of the system.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct CombatStats {
    /// Direct hits resolved this tick.
    pub hits_this_tick: u32,
    /// Direct-hit damage dispatched this tick.
    pub damage_this_tick: f32,
    /// Projectiles left unchecked this tick because the budget ran out.
    pub truncated_this_tick: u32,
    /// Units caught in area damage this tick.
    pub area_casualties_this_tick: u32,
    /// Direct hits resolved since construction.
    pub total_hits: u64,
    /// Direct-hit damage dispatched since construction.
    pub total_damage: f64,
    /// Units caught in area damage since construction.
    pub total_area_casualties: u64,
}

impl CombatStats {
    /// Rolls the per-tick counters over to a fresh tick.
    pub fn begin_tick(&mut self) {
        self.hits_this_tick = 0;
        self.damage_this_tick = 0.0;
        self.truncated_this_tick = 0;
        self.area_casualties_this_tick = 0;
    }

    /// Records one resolved direct hit.
    pub fn record_hit(&mut self, damage: f32) {
        self.hits_this_tick += 1;
        self.damage_this_tick += damage;
        self.total_hits += 1;
        self.total_damage += f64::from(damage);
    }

    /// Records one unit caught in area damage.
    pub fn record_area_casualty(&mut self) {
        self.area_casualties_this_tick += 1;
        self.total_area_casualties += 1;
    }

    /// Records projectiles skipped by the tick budget.
    pub fn record_truncated(&mut self, count: u32) {
        self.truncated_this_tick += count;
    }
}

// =============================================================================
// Tests
// =============================================================================
