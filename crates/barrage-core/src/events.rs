//! Lifecycle events emitted by the projectile manager.
//!
//! Events accumulate in order on an internal queue; callers drain them once
//! per tick through [`crate::manager::ProjectileManager::drain_events`] to
//! drive audio, replays, or network mirrors.

use serde::{Deserialize, Serialize};

use crate::projectile::ProjectileId;
use crate::unit::FactionId;

/// Why a projectile left the simulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Flight time ran out.
    Expired,
    /// Flew past the world boundary.
    OutOfBounds,
    /// Spent its pierce budget on a hit.
    Impact,
    /// Explicitly despawned by the caller.
    Forced,
}

/// One projectile lifecycle transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A projectile entered the simulation.
    ProjectileSpawned {
        /// Handle of the new projectile.
        id: ProjectileId,
        /// Faction that fired it.
        faction: FactionId,
        /// Tick it appeared on.
        tick: u64,
    },
    /// A projectile left the simulation.
    ProjectileDespawned {
        /// Handle of the departed projectile; stale from this point on.
        id: ProjectileId,
        /// What ended the flight.
        reason: DespawnReason,
        /// Tick it departed on.
        tick: u64,
    },
}
