//! # barrage-core
//!
//! Real-time projectile simulation for RTS-scale battles: thousands of
//! simultaneous projectiles advancing in fixed ticks, colliding with units,
//! and dispatching damage, without allocating in the steady state.
//!
//! ## Architecture
//!
//! - [`ProjectilePool`] pre-allocates every projectile slot and recycles
//!   them through generational [`ProjectileId`] handles, so stale handles
//!   can never touch a slot's next tenant.
//! - [`ProjectileTypeRegistry`] holds validated tuning records; projectiles
//!   snapshot their combat numbers at spawn.
//! - [`ProjectileManager`] owns the pool, a spatial hash grid, and a
//!   per-faction index, advancing flight (ballistic or homing) with a
//!   parallel integration phase and a sequential apply phase.
//! - [`ProjectileCollisionSystem`] resolves at most one hit per projectile
//!   per tick against the caller-owned [`UnitIndex`] and pushes damage and
//!   effects out through the [`DamageSink`] and [`EffectSink`] traits.
//!
//! Identical inputs produce identical battles: iteration orders are fixed,
//! parallel results are applied sequentially in slot order, and ties break
//! on ids.
//!
//! ## Example
//!
//! ```
//! use barrage_core::{
//!     DamageSink, FactionId, NoEffects, ProjectileCollisionSystem, ProjectileManager,
//!     UnitBody, UnitId, UnitIndex,
//! };
//! use glam::Vec3;
//!
//! #[derive(Default)]
//! struct HealthBook {
//!     hits: Vec<(UnitId, f32)>,
//! }
//!
//! impl DamageSink for HealthBook {
//!     fn apply_damage(&mut self, target: UnitId, amount: f32, _attacker: FactionId) {
//!         self.hits.push((target, amount));
//!     }
//! }
//!
//! let mut manager = ProjectileManager::with_defaults();
//! let mut units = UnitIndex::new(32.0);
//! units.register(
//!     UnitId::new(1),
//!     UnitBody {
//!         position: Vec3::new(0.0, 0.0, 60.0),
//!         radius: 2.0,
//!         faction: FactionId::new(2),
//!     },
//! );
//!
//! manager.spawn(
//!     FactionId::new(1),
//!     "standard_bullet",
//!     Vec3::ZERO,
//!     Vec3::new(0.0, 0.0, 1.0),
//!     None,
//! );
//! manager.advance(0.1, &units);
//!
//! let mut system = ProjectileCollisionSystem::new();
//! let mut health = HealthBook::default();
//! let hits = system.process_collisions(&mut manager, &units, &mut health, &mut NoEffects);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(health.hits, vec![(UnitId::new(1), 8.0)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collision;
pub mod events;
pub mod hooks;
pub mod manager;
mod motion;
pub mod pool;
pub mod projectile;
pub mod registry;
pub mod stats;
pub mod unit;

#[cfg(test)]
mod tests;

pub use collision::{
    closest_unit, units_in_radius_excluding, CollisionDetector, CollisionResult, Contact,
    ProjectileCollisionSystem,
};
pub use events::{DespawnReason, SimEvent};
pub use hooks::{DamageSink, EffectSink, NoEffects, TargetLookup};
pub use manager::{ManagerConfig, ProjectileManager};
pub use pool::ProjectilePool;
pub use projectile::{EffectTag, MotionKind, Projectile, ProjectileId, ProjectileTypeId};
pub use registry::{ProjectileType, ProjectileTypeError, ProjectileTypeRegistry};
pub use stats::{CombatStats, ManagerStats};
pub use unit::{FactionId, UnitBody, UnitId, UnitIndex};

// The spatial substrate is part of the public API surface.
pub use lattice;
