//! Collision resolution: narrow-phase detection and the per-tick system.

mod detector;
mod system;

pub use detector::{closest_unit, units_in_radius_excluding, CollisionDetector, Contact};
pub use system::{CollisionResult, ProjectileCollisionSystem};
