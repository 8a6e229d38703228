//! Projectile type records and the registry that owns them.
//!
//! A [`ProjectileType`] is pure data: speed, damage, pierce budget, homing
//! tuning, and an optional impact effect. Records are validated on
//! registration, so a live [`ProjectileTypeRegistry`] never hands out a
//! degenerate type. Registering a name twice replaces the old record;
//! projectiles already in flight keep the values they snapshotted at spawn.
//!
//! The registry ships with a handful of built-in archetypes
//! ([`ProjectileTypeRegistry::with_defaults`]) covering the common RTS
//! roles: fast bullets, slow heavy shells, a seeker missile, and a piercing
//! wave.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::projectile::{EffectTag, MotionKind, ProjectileTypeId};

/// Validation failure for a projectile type record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectileTypeError {
    /// Speed must be finite and strictly positive.
    #[error("projectile type {0} has non-positive speed {1}")]
    NonPositiveSpeed(ProjectileTypeId, f32),
    /// Lifetime must be finite and strictly positive.
    #[error("projectile type {0} has non-positive lifetime {1}")]
    NonPositiveLifetime(ProjectileTypeId, f32),
    /// Damage may be zero (utility rounds) but never negative.
    #[error("projectile type {0} has negative damage {1}")]
    NegativeDamage(ProjectileTypeId, f32),
    /// Hit radius may be zero (point projectile) but never negative.
    #[error("projectile type {0} has negative hit radius {1}")]
    NegativeHitRadius(ProjectileTypeId, f32),
    /// Homing strength scales the turn clamp and must stay in `[0, 1]`.
    #[error("projectile type {0} has homing strength {1} outside [0, 1]")]
    HomingStrengthOutOfRange(ProjectileTypeId, f32),
    /// Turn rate is degrees per second and must not be negative.
    #[error("projectile type {0} has negative turn rate {1}")]
    NegativeTurnRate(ProjectileTypeId, f32),
}

fn default_homing_strength() -> f32 {
    1.0
}

/// Tuning record for one projectile type.
///
/// Combat fields are copied onto each projectile at spawn; editing a record
/// mid-game only affects projectiles spawned afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileType {
    /// Registry name.
    pub id: ProjectileTypeId,
    /// Flight model.
    #[serde(default)]
    pub motion: MotionKind,
    /// Muzzle speed in units per second.
    pub speed: f32,
    /// Damage per hit.
    #[serde(default)]
    pub damage: f32,
    /// Collision radius of the projectile itself.
    #[serde(default)]
    pub hit_radius: f32,
    /// Extra hits after the first before despawning.
    #[serde(default)]
    pub pierce_count: u32,
    /// Maximum flight time in seconds.
    pub lifetime: f32,
    /// Maximum turn in degrees per second (homing only).
    #[serde(default)]
    pub turn_rate: f32,
    /// Fraction of the turn clamp actually available, in `[0, 1]`.
    #[serde(default = "default_homing_strength")]
    pub homing_strength: f32,
    /// Effect triggered at the impact point, if any.
    #[serde(default)]
    pub effect: Option<EffectTag>,
}

impl ProjectileType {
    /// Starts a straight-flying type with placeholder combat values.
    #[must_use]
    pub fn ballistic(id: &str) -> Self {
        Self {
            id: ProjectileTypeId::new(id),
            motion: MotionKind::Ballistic,
            speed: 100.0,
            damage: 10.0,
            hit_radius: 0.5,
            pierce_count: 0,
            lifetime: 5.0,
            turn_rate: 0.0,
            homing_strength: 1.0,
            effect: None,
        }
    }

    /// Starts a homing type with placeholder combat values.
    #[must_use]
    pub fn homing(id: &str) -> Self {
        Self {
            motion: MotionKind::Homing,
            turn_rate: 90.0,
            ..Self::ballistic(id)
        }
    }

    /// Sets the muzzle speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the damage per hit.
    #[must_use]
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Sets the collision radius.
    #[must_use]
    pub fn with_hit_radius(mut self, hit_radius: f32) -> Self {
        self.hit_radius = hit_radius;
        self
    }

    /// Sets the pierce budget (extra hits after the first).
    #[must_use]
    pub fn with_pierce(mut self, pierce_count: u32) -> Self {
        self.pierce_count = pierce_count;
        self
    }

    /// Sets the maximum flight time.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the turn clamp in degrees per second.
    #[must_use]
    pub fn with_turn_rate(mut self, turn_rate: f32) -> Self {
        self.turn_rate = turn_rate;
        self
    }

    /// Sets the homing strength in `[0, 1]`.
    #[must_use]
    pub fn with_homing_strength(mut self, homing_strength: f32) -> Self {
        self.homing_strength = homing_strength;
        self
    }

    /// Sets the impact effect tag.
    #[must_use]
    pub fn with_effect(mut self, effect: &str) -> Self {
        self.effect = Some(EffectTag::new(effect));
        self
    }

    /// Checks the record against the registration rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the record breaks.
    pub fn validate(&self) -> Result<(), ProjectileTypeError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ProjectileTypeError::NonPositiveSpeed(
                self.id.clone(),
                self.speed,
            ));
        }
        if !self.lifetime.is_finite() || self.lifetime <= 0.0 {
            return Err(ProjectileTypeError::NonPositiveLifetime(
                self.id.clone(),
                self.lifetime,
            ));
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(ProjectileTypeError::NegativeDamage(
                self.id.clone(),
                self.damage,
            ));
        }
        if !self.hit_radius.is_finite() || self.hit_radius < 0.0 {
            return Err(ProjectileTypeError::NegativeHitRadius(
                self.id.clone(),
                self.hit_radius,
            ));
        }
        if !self.homing_strength.is_finite() || !(0.0..=1.0).contains(&self.homing_strength) {
            return Err(ProjectileTypeError::HomingStrengthOutOfRange(
                self.id.clone(),
                self.homing_strength,
            ));
        }
        if !self.turn_rate.is_finite() || self.turn_rate < 0.0 {
            return Err(ProjectileTypeError::NegativeTurnRate(
                self.id.clone(),
                self.turn_rate,
            ));
        }
        Ok(())
    }
}

/// Validated table of projectile types, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectileTypeRegistry {
    types: BTreeMap<ProjectileTypeId, ProjectileType>,
}

impl ProjectileTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the built-in archetypes.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ty in Self::default_types() {
            debug_assert!(ty.validate().is_ok());
            registry.types.insert(ty.id.clone(), ty);
        }
        registry
    }

    fn default_types() -> Vec<ProjectileType> {
        vec![
            ProjectileType::ballistic("standard_bullet")
                .with_speed(600.0)
                .with_damage(8.0)
                .with_hit_radius(0.4)
                .with_lifetime(2.0),
            ProjectileType::ballistic("plasma_bolt")
                .with_speed(240.0)
                .with_damage(22.0)
                .with_hit_radius(1.2)
                .with_lifetime(2.5)
                .with_effect("plasma_impact"),
            ProjectileType::ballistic("siege_shell")
                .with_speed(140.0)
                .with_damage(90.0)
                .with_hit_radius(1.8)
                .with_pierce(1)
                .with_lifetime(4.0)
                .with_effect("shell_blast"),
            ProjectileType::homing("seeker_missile")
                .with_speed(120.0)
                .with_damage(45.0)
                .with_hit_radius(1.0)
                .with_lifetime(6.0)
                .with_turn_rate(180.0)
                .with_homing_strength(0.95)
                .with_effect("missile_burst"),
            ProjectileType::ballistic("ring_wash")
                .with_speed(200.0)
                .with_damage(15.0)
                .with_hit_radius(2.5)
                .with_pierce(3)
                .with_lifetime(1.5)
                .with_effect("ring_flash"),
        ]
    }

    /// Registers a type, replacing any record under the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectileTypeError`] and leaves the registry unchanged
    /// if the record fails validation.
    pub fn register(&mut self, ty: ProjectileType) -> Result<(), ProjectileTypeError> {
        ty.validate()?;
        let id = ty.id.clone();
        if self.types.insert(id.clone(), ty).is_some() {
            warn!("projectile type {} re-registered, replacing its record", id);
        }
        Ok(())
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProjectileType> {
        self.types.get(id)
    }

    /// Whether a type with this name is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names in sorted order.
    pub fn type_ids(&self) -> impl Iterator<Item = &ProjectileTypeId> {
        self.types.keys()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_standard_archetypes() {
        let registry = ProjectileTypeRegistry::with_defaults();
        assert_eq!(registry.len(), 5);

        let bullet = registry.get("standard_bullet").unwrap();
        assert_eq!(bullet.motion, MotionKind::Ballistic);
        assert_eq!(bullet.speed, 600.0);
        assert_eq!(bullet.pierce_count, 0);

        let seeker = registry.get("seeker_missile").unwrap();
        assert_eq!(seeker.motion, MotionKind::Homing);
        assert_eq!(seeker.turn_rate, 180.0);
        assert_eq!(seeker.homing_strength, 0.95);

        let wash = registry.get("ring_wash").unwrap();
        assert_eq!(wash.pierce_count, 3);
        assert_eq!(wash.effect, Some(EffectTag::new("ring_flash")));
    }

    #[test]
    fn register_rejects_non_positive_speed() {
        let mut registry = ProjectileTypeRegistry::new();
        let err = registry
            .register(ProjectileType::ballistic("bad").with_speed(0.0))
            .unwrap_err();
        assert!(matches!(err, ProjectileTypeError::NonPositiveSpeed(_, _)));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_rejects_non_finite_values() {
        let mut registry = ProjectileTypeRegistry::new();
        let err = registry
            .register(ProjectileType::ballistic("bad").with_lifetime(f32::NAN))
            .unwrap_err();
        assert!(matches!(err, ProjectileTypeError::NonPositiveLifetime(_, _)));
    }

    #[test]
    fn register_rejects_negative_damage_and_radius() {
        let mut registry = ProjectileTypeRegistry::new();
        assert!(matches!(
            registry
                .register(ProjectileType::ballistic("bad").with_damage(-1.0))
                .unwrap_err(),
            ProjectileTypeError::NegativeDamage(_, _)
        ));
        assert!(matches!(
            registry
                .register(ProjectileType::ballistic("bad").with_hit_radius(-0.1))
                .unwrap_err(),
            ProjectileTypeError::NegativeHitRadius(_, _)
        ));
    }

    #[test]
    fn register_rejects_out_of_range_homing_tuning() {
        let mut registry = ProjectileTypeRegistry::new();
        assert!(matches!(
            registry
                .register(ProjectileType::homing("bad").with_homing_strength(1.5))
                .unwrap_err(),
            ProjectileTypeError::HomingStrengthOutOfRange(_, _)
        ));
        assert!(matches!(
            registry
                .register(ProjectileType::homing("bad").with_turn_rate(-10.0))
                .unwrap_err(),
            ProjectileTypeError::NegativeTurnRate(_, _)
        ));
    }

    #[test]
    fn zero_damage_utility_round_is_allowed() {
        let mut registry = ProjectileTypeRegistry::new();
        registry
            .register(ProjectileType::ballistic("marker_dart").with_damage(0.0))
            .unwrap();
        assert!(registry.contains("marker_dart"));
    }

    #[test]
    fn re_registering_replaces_the_record() {
        let mut registry = ProjectileTypeRegistry::with_defaults();
        registry
            .register(ProjectileType::ballistic("standard_bullet").with_damage(99.0))
            .unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("standard_bullet").unwrap().damage, 99.0);
    }

    #[test]
    fn types_deserialize_from_json_with_defaults_filled_in() {
        let json = r#"{ "id": "needle", "speed": 900.0, "lifetime": 0.8 }"#;
        let ty: ProjectileType = serde_json::from_str(json).unwrap();

        assert_eq!(ty.id.as_str(), "needle");
        assert_eq!(ty.motion, MotionKind::Ballistic);
        assert_eq!(ty.damage, 0.0);
        assert_eq!(ty.pierce_count, 0);
        assert_eq!(ty.homing_strength, 1.0);
        assert_eq!(ty.effect, None);

        let mut registry = ProjectileTypeRegistry::new();
        registry.register(ty).unwrap();
        assert!(registry.contains("needle"));
    }

    #[test]
    fn registry_round_trips_through_serde() {
        let registry = ProjectileTypeRegistry::with_defaults();
        let json = serde_json::to_string(&registry).unwrap();
        let back: ProjectileTypeRegistry = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), registry.len());
        assert_eq!(
            back.get("siege_shell").unwrap().damage,
            registry.get("siege_shell").unwrap().damage
        );
    }

    #[test]
    fn type_ids_iterate_in_sorted_order() {
        let registry = ProjectileTypeRegistry::with_defaults();
        let names: Vec<&str> = registry.type_ids().map(ProjectileTypeId::as_str).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
