//! Narrow-phase detection of projectile-unit contacts.

use glam::Vec3;

use crate::projectile::Projectile;
use crate::unit::{FactionId, UnitId, UnitIndex};

/// A confirmed projectile-unit contact.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Contact {
    /// Unit that was struck.
    pub unit: UnitId,
    /// Unit center at the moment of contact.
    pub position: Vec3,
    /// Distance between projectile and unit centers.
    pub distance: f32,
}

/// Sphere-overlap detector for a single projectile against the unit index.
///
/// The candidate window is `hit_radius + max unit radius + margin`, which
/// guarantees no unit body can overlap the projectile while its center sits
/// outside the window. Contacts are then confirmed by exact center distance
/// against the summed radii.
#[derive(Debug, Copy, Clone)]
pub struct CollisionDetector {
    margin: f32,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionDetector {
    /// Creates a detector with a small default search margin.
    #[must_use]
    pub const fn new() -> Self {
        Self { margin: 0.5 }
    }

    /// Overrides the extra slack added to the candidate window.
    #[must_use]
    pub const fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// The extra slack added to the candidate window.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Finds the unit this projectile strikes, if any.
    ///
    /// Own-faction units and units already struck by this projectile are
    /// skipped. When several units overlap the projectile the nearest wins;
    /// candidates arrive sorted by id, so an exact distance tie goes to the
    /// lower id.
    #[must_use]
    pub fn detect(&self, projectile: &Projectile, units: &UnitIndex) -> Option<Contact> {
        let reach = projectile.hit_radius + units.max_radius() + self.margin;
        let mut best: Option<Contact> = None;

        for unit in units.units_in_radius(projectile.position, reach) {
            let Some(body) = units.get(unit) else { continue };
            if body.faction == projectile.faction {
                continue;
            }
            if projectile.has_hit(unit) {
                continue;
            }
            let distance = projectile.position.distance(body.position);
            if distance > projectile.hit_radius + body.radius {
                continue;
            }
            match best {
                Some(contact) if contact.distance <= distance => {}
                _ => {
                    best = Some(Contact {
                        unit,
                        position: body.position,
                        distance,
                    });
                }
            }
        }
        best
    }
}

/// Units within `radius` of `center`, with their center distances, sorted
/// by id.
///
/// Units of `exclude` are filtered out. Read-only with respect to pierce
/// accounting; area damage and ability targeting build on this.
#[must_use]
pub fn units_in_radius_excluding(
    units: &UnitIndex,
    center: Vec3,
    radius: f32,
    exclude: Option<FactionId>,
) -> Vec<(UnitId, f32)> {
    units
        .units_in_radius(center, radius)
        .into_iter()
        .filter_map(|unit| {
            let body = units.get(unit)?;
            if exclude == Some(body.faction) {
                return None;
            }
            Some((unit, center.distance(body.position)))
        })
        .collect()
}

/// The registered unit closest to `point`, with its distance.
///
/// Units of `exclude_faction` are skipped. Ties go to the lower id because
/// the index iterates in id order. Used by weapon systems to pick targets
/// before spawning.
#[must_use]
pub fn closest_unit(
    units: &UnitIndex,
    point: Vec3,
    exclude_faction: Option<FactionId>,
) -> Option<(UnitId, f32)> {
    let mut best: Option<(UnitId, f32)> = None;
    for (id, body) in units.iter() {
        if exclude_faction == Some(body.faction) {
            continue;
        }
        let distance = point.distance(body.position);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((id, distance)),
        }
    }
    best
}

// =============================================================================
// Tests
// =============================================================================
