//! Projectile instances and the identifiers that name them.
//!
//! A [`Projectile`] is a pool slot: a flat record of kinematics plus the
//! combat state snapshot copied from its [`ProjectileType`] at spawn. Slots
//! are recycled, so ids carry a generation counter that stale handles fail
//! to match.
//!
//! [`ProjectileType`]: crate::registry::ProjectileType

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::ProjectileType;
use crate::unit::{FactionId, UnitId};

/// Generational handle to a pooled projectile.
///
/// The index addresses a pool slot; the generation distinguishes successive
/// tenants of that slot. A handle from a despawned projectile is permanently
/// stale: it never aliases the slot's next occupant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId {
    index: u32,
    generation: u32,
}

impl ProjectileId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Pool slot this handle points at.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Tenancy counter for the slot.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g{}", self.index, self.generation)
    }
}

/// Interned name of a projectile type, e.g. `"standard_bullet"`.
///
/// Cheap to clone; every live projectile carries one back to its tuning
/// record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileTypeId(Arc<str>);

impl ProjectileTypeId {
    /// Creates a type id from a name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shared empty id used by vacant pool slots. Never allocates after the
    /// first call.
    pub(crate) fn empty() -> Self {
        static EMPTY: OnceLock<Arc<str>> = OnceLock::new();
        Self(EMPTY.get_or_init(|| Arc::from("")).clone())
    }
}

impl Default for ProjectileTypeId {
    fn default() -> Self {
        Self::empty()
    }
}

impl Borrow<str> for ProjectileTypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectileTypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ProjectileTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ProjectileTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectileTypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self(Arc::from(name.as_str())))
    }
}

/// Name of a gameplay effect fired on impact, e.g. `"plasma_impact"`.
///
/// The core never interprets these; they are forwarded verbatim to the
/// caller's effect sink.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectTag(Arc<str>);

impl EffectTag {
    /// Creates an effect tag from a name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EffectTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EffectTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self(Arc::from(name.as_str())))
    }
}

/// How a projectile moves each tick.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    /// Straight-line flight at constant velocity.
    #[default]
    Ballistic,
    /// Turns toward a tracked unit, up to a per-tick angle clamp.
    Homing,
}

/// One pooled projectile.
///
/// Combat numbers (`damage`, `hit_radius`, `pierce_remaining`) are copied
/// out of the type record at spawn, so editing a type mid-flight never
/// changes projectiles already in the air.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    id: ProjectileId,
    /// Owning faction; credited as the attacker on every hit.
    pub faction: FactionId,
    /// Type this instance was spawned from.
    pub type_id: ProjectileTypeId,
    /// World position.
    pub position: Vec3,
    /// World velocity (direction times speed).
    pub velocity: Vec3,
    /// Seconds of flight remaining.
    pub lifetime: f32,
    /// Damage dealt per hit.
    pub damage: f32,
    /// Collision radius.
    pub hit_radius: f32,
    /// Homing target; `None` flies ballistic for the rest of the flight.
    pub target: Option<UnitId>,
    /// Extra hits allowed after the first; negative once spent.
    pub pierce_remaining: i32,
    /// Tick the projectile was spawned on.
    pub spawn_tick: u64,
    already_hit: HashSet<UnitId>,
    active: bool,
}

impl Projectile {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            id: ProjectileId::new(index, 0),
            faction: FactionId::default(),
            type_id: ProjectileTypeId::empty(),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            lifetime: 0.0,
            damage: 0.0,
            hit_radius: 0.0,
            target: None,
            pierce_remaining: 0,
            spawn_tick: 0,
            already_hit: HashSet::new(),
            active: false,
        }
    }

    /// Handle for this projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Whether the slot currently holds a live projectile.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether this projectile has already hit the given unit.
    #[must_use]
    pub fn has_hit(&self, unit: UnitId) -> bool {
        self.already_hit.contains(&unit)
    }

    /// Number of distinct units hit so far this flight.
    #[must_use]
    pub fn hits_scored(&self) -> usize {
        self.already_hit.len()
    }

    pub(crate) fn initialize(
        &mut self,
        faction: FactionId,
        ty: &ProjectileType,
        position: Vec3,
        velocity: Vec3,
        target: Option<UnitId>,
        spawn_tick: u64,
    ) {
        self.faction = faction;
        self.type_id = ty.id.clone();
        self.position = position;
        self.velocity = velocity;
        self.lifetime = ty.lifetime;
        self.damage = ty.damage;
        self.hit_radius = ty.hit_radius;
        self.target = target;
        self.pierce_remaining = i32::try_from(ty.pierce_count).unwrap_or(i32::MAX);
        self.spawn_tick = spawn_tick;
        self.already_hit.clear();
    }

    /// Records a hit against `unit`.
    ///
    /// Returns `None` if the unit was already hit this flight (dispatch
    /// nothing), otherwise `Some(despawn)` where `despawn` reports that the
    /// pierce budget is now spent.
    pub(crate) fn register_hit(&mut self, unit: UnitId) -> Option<bool> {
        if !self.already_hit.insert(unit) {
            return None;
        }
        self.pierce_remaining -= 1;
        Some(self.pierce_remaining < 0)
    }

    pub(crate) fn mark_active(&mut self) {
        self.active = true;
    }

    /// Scrubs the slot for its next tenant. The hit set keeps its capacity;
    /// the id is left for the pool to advance.
    pub(crate) fn reset(&mut self) {
        self.faction = FactionId::default();
        self.type_id = ProjectileTypeId::empty();
        self.position = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
        self.lifetime = 0.0;
        self.damage = 0.0;
        self.hit_radius = 0.0;
        self.target = None;
        self.pierce_remaining = 0;
        self.spawn_tick = 0;
        self.already_hit.clear();
        self.active = false;
    }

    pub(crate) fn advance_generation(&mut self) {
        self.id = ProjectileId::new(self.id.index(), self.id.generation().wrapping_add(1));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProjectileType;

    fn spawned(ty: &ProjectileType) -> Projectile {
        let mut projectile = Projectile::new(0);
        projectile.mark_active();
        projectile.initialize(
            FactionId::new(1),
            ty,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, ty.speed),
            None,
            7,
        );
        projectile
    }

    #[test]
    fn initialize_snapshots_type_values() {
        let ty = ProjectileType::ballistic("test_round")
            .with_speed(300.0)
            .with_damage(12.0)
            .with_hit_radius(0.8)
            .with_pierce(2)
            .with_lifetime(3.0);
        let projectile = spawned(&ty);

        assert_eq!(projectile.type_id.as_str(), "test_round");
        assert_eq!(projectile.damage, 12.0);
        assert_eq!(projectile.hit_radius, 0.8);
        assert_eq!(projectile.pierce_remaining, 2);
        assert_eq!(projectile.lifetime, 3.0);
        assert_eq!(projectile.spawn_tick, 7);
    }

    #[test]
    fn register_hit_consumes_pierce_budget() {
        let ty = ProjectileType::ballistic("test_round").with_pierce(1);
        let mut projectile = spawned(&ty);

        // Pierce 1 allows two distinct hits; the second spends the budget.
        assert_eq!(projectile.register_hit(UnitId::new(10)), Some(false));
        assert_eq!(projectile.register_hit(UnitId::new(11)), Some(true));
        assert_eq!(projectile.hits_scored(), 2);
    }

    #[test]
    fn register_hit_ignores_repeat_units() {
        let ty = ProjectileType::ballistic("test_round").with_pierce(3);
        let mut projectile = spawned(&ty);

        assert_eq!(projectile.register_hit(UnitId::new(10)), Some(false));
        assert_eq!(projectile.register_hit(UnitId::new(10)), None);
        assert_eq!(projectile.pierce_remaining, 2);
        assert!(projectile.has_hit(UnitId::new(10)));
        assert!(!projectile.has_hit(UnitId::new(11)));
    }

    #[test]
    fn zero_pierce_despawns_on_first_hit() {
        let ty = ProjectileType::ballistic("test_round");
        let mut projectile = spawned(&ty);

        assert_eq!(projectile.register_hit(UnitId::new(10)), Some(true));
    }

    #[test]
    fn reset_scrubs_state_but_keeps_slot_id() {
        let ty = ProjectileType::ballistic("test_round").with_pierce(1);
        let mut projectile = spawned(&ty);
        projectile.register_hit(UnitId::new(10));

        projectile.reset();
        assert!(!projectile.is_active());
        assert_eq!(projectile.type_id.as_str(), "");
        assert_eq!(projectile.velocity, Vec3::ZERO);
        assert_eq!(projectile.hits_scored(), 0);
        assert_eq!(projectile.id(), ProjectileId::new(0, 0));

        projectile.advance_generation();
        assert_eq!(projectile.id(), ProjectileId::new(0, 1));
    }

    #[test]
    fn projectile_id_orders_by_slot_then_generation() {
        let mut ids = vec![
            ProjectileId::new(2, 0),
            ProjectileId::new(0, 5),
            ProjectileId::new(0, 1),
            ProjectileId::new(1, 0),
        ];
        ids.sort_unstable();
        assert_eq!(
            ids,
            vec![
                ProjectileId::new(0, 1),
                ProjectileId::new(0, 5),
                ProjectileId::new(1, 0),
                ProjectileId::new(2, 0),
            ]
        );
    }

    #[test]
    fn type_id_serializes_as_plain_string() {
        let id = ProjectileTypeId::new("plasma_bolt");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"plasma_bolt\"");

        let back: ProjectileTypeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn projectile_record_round_trips_through_serde() {
        let ty = ProjectileType::ballistic("test_round").with_pierce(1);
        let mut projectile = spawned(&ty);
        projectile.register_hit(UnitId::new(4));

        let json = serde_json::to_string(&projectile).unwrap();
        let back: Projectile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), projectile.id());
        assert_eq!(back.type_id, projectile.type_id);
        assert!(back.has_hit(UnitId::new(4)));
        assert_eq!(back.pierce_remaining, projectile.pierce_remaining);
    }
}
