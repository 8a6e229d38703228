//! Collaborator traits linking the projectile core to the owning game.
//!
//! The core deliberately knows nothing about health pools, render layers, or
//! audio. Homing reads target positions through [`TargetLookup`]; resolved
//! hits are dispatched outward through [`DamageSink`] and [`EffectSink`].
//! Game systems implement these on whatever owns the real data.

use glam::Vec3;

use crate::projectile::EffectTag;
use crate::unit::{FactionId, UnitId};

/// Read-only position source for homing projectiles.
///
/// Implementations must answer from a consistent snapshot for the duration
/// of one tick; [`crate::unit::UnitIndex`] does this out of the box.
pub trait TargetLookup: Send + Sync {
    /// Current position of `target`, or `None` if it no longer exists.
    fn target_position(&self, target: UnitId) -> Option<Vec3>;
}

/// Receives damage from resolved collisions.
pub trait DamageSink {
    /// Applies `amount` damage to `target`, credited to `attacker`.
    fn apply_damage(&mut self, target: UnitId, amount: f32, attacker: FactionId);
}

/// Receives gameplay effect triggers from impacts.
pub trait EffectSink {
    /// Fires the named effect at a world position.
    fn trigger_effect(&mut self, effect: &EffectTag, position: Vec3);
}

/// [`EffectSink`] that drops every trigger. Handy for headless runs.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn trigger_effect(&mut self, _effect: &EffectTag, _position: Vec3) {}
}
