//! Messages consumed and produced by the turret systems.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::resources::PrefabId;
use crate::types::{RotateDirection, WeaponSlot};

/// Raw pointer motion for aiming, y pointing up.
///
/// The delta is applied to every [`crate::components::Turret`] after scaling by
/// `mouse_velocity` and inverting the x axis.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct AimInput {
    pub delta: Vec2,
}

impl AimInput {
    pub fn new(delta: Vec2) -> Self {
        Self { delta }
    }
}

/// Request to turn the weapon mount to a neighbouring slot.
#[derive(Message, Clone, Copy, Debug)]
pub struct RotateInput {
    pub direction: RotateDirection,
}

impl RotateInput {
    pub fn left() -> Self {
        Self {
            direction: RotateDirection::Left,
        }
    }

    pub fn right() -> Self {
        Self {
            direction: RotateDirection::Right,
        }
    }
}

/// Request to fire the slot currently facing the player.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct FireInput;

/// Event fired when a turret discharges a projectile.
///
/// # Fields
/// * `turret` - Turret that fired
/// * `slot` - Slot that was facing the player
/// * `prefab` - Projectile prefab spawned
/// * `projectile` - Pooled entity carrying the shot
/// * `origin` - Muzzle position in world space
/// * `impulse` - Impulse applied to the projectile
#[derive(Message, Clone, Debug)]
pub struct ShotFired {
    pub turret: Entity,
    pub slot: WeaponSlot,
    pub prefab: PrefabId,
    pub projectile: Entity,
    pub origin: Vec3,
    pub impulse: Vec3,
}

/// Event fired when a mount rotation completes and the rotation lock is released.
#[derive(Message, Clone, Copy, Debug)]
pub struct RotationFinished {
    pub turret: Entity,
    pub slot: WeaponSlot,
}

/// Contact between two entities, from either a sensor overlap or a rigid collision.
///
/// With the `dim3` feature, avian's collision-start messages are forwarded
/// here; anything else that detects contacts can write these directly.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: Entity,
    pub b: Entity,
}

/// Event fired when a target is hit.
///
/// # Fields
/// * `target` - Entity that was hit
/// * `other` - Entity that hit it
/// * `points` - Base points of the target
/// * `perfect` - Whether both carried the same [`crate::components::HitTag`]
/// * `position` - Target position at the time of the hit
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use rotary_turret::events::HitEvent;
///
/// let hit = HitEvent {
///     target: Entity::PLACEHOLDER,
///     other: Entity::PLACEHOLDER,
///     points: 10,
///     perfect: true,
///     position: Vec3::ZERO,
/// };
/// assert_eq!(hit.award(), 20);
/// ```
#[derive(Message, Clone, Debug)]
pub struct HitEvent {
    pub target: Entity,
    pub other: Entity,
    pub points: u32,
    pub perfect: bool,
    pub position: Vec3,
}

impl HitEvent {
    /// Points this hit is worth once the perfect bonus is applied.
    pub fn award(&self) -> u64 {
        if self.perfect {
            u64::from(self.points) * 2
        } else {
            u64::from(self.points)
        }
    }
}

/// Event fired after every score award with the new running total.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreChanged {
    pub total: u64,
}
