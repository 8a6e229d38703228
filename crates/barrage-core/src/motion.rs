//! Per-projectile kinematics: ballistic integration and homing steering.
//!
//! Pure functions over immutable projectile state, so the manager can fan
//! the integration phase out across a thread pool. Homing rotates the
//! velocity toward the target around the axis perpendicular to both
//! directions, clamped to the type's per-tick turn budget; speed is
//! reapplied from the pre-turn magnitude so steering never bleeds energy.

use glam::{Quat, Vec3};

use crate::hooks::TargetLookup;
use crate::projectile::{MotionKind, Projectile};
use crate::registry::ProjectileTypeRegistry;

/// Result of advancing one projectile by one timestep.
#[derive(Debug, Copy, Clone)]
pub(crate) struct StepOutcome {
    pub position: Vec3,
    pub velocity: Vec3,
    /// The homing target vanished this step; the flight continues ballistic.
    pub target_lost: bool,
}

/// Advances one projectile by `delta` seconds without mutating it.
pub(crate) fn step(
    projectile: &Projectile,
    types: &ProjectileTypeRegistry,
    delta: f32,
    targets: &dyn TargetLookup,
) -> StepOutcome {
    let mut velocity = projectile.velocity;
    let mut target_lost = false;

    if let Some(target) = projectile.target {
        // A type can be replaced mid-flight; if homing tuning is gone the
        // projectile just flies straight.
        if let Some(ty) = types.get(projectile.type_id.as_str()) {
            if ty.motion == MotionKind::Homing {
                match targets.target_position(target) {
                    Some(goal) => {
                        velocity = steer_toward(
                            projectile.position,
                            velocity,
                            goal,
                            ty.turn_rate,
                            ty.homing_strength,
                            delta,
                        );
                    }
                    None => target_lost = true,
                }
            }
        }
    }

    StepOutcome {
        position: projectile.position + velocity * delta,
        velocity,
        target_lost,
    }
}

/// Rotates `velocity` toward `goal` by at most the per-tick turn budget.
///
/// Degenerate geometry (zero velocity, sitting on the target, or flying
/// exactly toward or away from it) leaves the velocity untouched; a
/// projectile aimed dead away from its target will never come back.
fn steer_toward(
    position: Vec3,
    velocity: Vec3,
    goal: Vec3,
    turn_rate_deg: f32,
    strength: f32,
    delta: f32,
) -> Vec3 {
    let speed = velocity.length();
    let Some(current) = velocity.try_normalize() else {
        return velocity;
    };
    let Some(desired) = (goal - position).try_normalize() else {
        return velocity;
    };

    let max_turn = turn_rate_deg.to_radians() * strength * delta;
    if max_turn <= 0.0 {
        return velocity;
    }

    let axis = current.cross(desired);
    if axis.length_squared() <= f32::EPSILON {
        return velocity;
    }

    let turn = current.angle_between(desired).min(max_turn);
    let rotation = Quat::from_axis_angle(axis.normalize(), turn);
    let direction = (rotation * current).try_normalize().unwrap_or(current);
    direction * speed
}

// =============================================================================
// Tests
// =============================================================================
