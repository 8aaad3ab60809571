//! Core components for the turret, its weapon slots and what it shoots at.

use std::time::Duration;

use bevy::prelude::*;

use crate::resources::PrefabId;
use crate::types::{RotateDirection, WeaponSlot};

/// Player-controlled turret state.
///
/// The turret body follows `aim_position`; the weapon mount (`mount`, usually
/// a child entity) yaws so that `current_slot` faces the player. Two
/// independent locks gate the inputs:
/// - the rotation lock is held while a [`RotationTween`] is in flight,
/// - the fire lock is held while the shot cooldown runs.
///
/// A shot is only honoured when neither lock is held.
///
/// # Fields
/// * `current_slot` - Weapon slot facing the player (switches as soon as a rotation starts)
/// * `aim_position` - Clamped 2D position of the turret body, taken from its `Transform` on spawn
/// * `mount` - Entity whose yaw carries the three weapon slots
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use rotary_turret::components::Turret;
///
/// let turret = Turret::new(Entity::PLACEHOLDER);
/// assert!(turret.can_fire());
/// assert!(turret.can_rotate());
/// ```
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct Turret {
    pub current_slot: WeaponSlot,
    pub aim_position: Vec2,
    pub mount: Entity,
    rotation: Option<RotationTween>,
    cooldown: Option<Timer>,
}

impl Turret {
    /// Creates an idle, ready turret driving the given mount.
    pub fn new(mount: Entity) -> Self {
        Self {
            current_slot: WeaponSlot::DEFAULT,
            aim_position: Vec2::ZERO,
            mount,
            rotation: None,
            cooldown: None,
        }
    }

    /// Whether a mount rotation is in flight (rotation lock).
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    /// Whether the shot cooldown is running (fire lock).
    pub fn is_cooling(&self) -> bool {
        self.cooldown.is_some()
    }

    pub fn can_rotate(&self) -> bool {
        !self.is_rotating()
    }

    /// Ready to fire: not rotating and not cooling down.
    pub fn can_fire(&self) -> bool {
        !self.is_rotating() && !self.is_cooling()
    }

    /// The rotation currently in flight, if any.
    pub fn rotation(&self) -> Option<&RotationTween> {
        self.rotation.as_ref()
    }

    /// Gated rotation request coming from input.
    ///
    /// Takes the rotation lock, switches to the neighbouring slot and starts a
    /// tween of the mount from `mount_rotation` to that slot's yaw.
    ///
    /// # Arguments
    /// * `direction` - Which neighbour to turn to
    /// * `mount_rotation` - Current rotation of the mount
    /// * `duration` - How long the turn takes
    ///
    /// # Returns
    /// The `(from, to)` slots, or `None` if a rotation is already in flight
    pub fn request_rotation(
        &mut self,
        direction: RotateDirection,
        mount_rotation: Quat,
        duration: Duration,
    ) -> Option<(WeaponSlot, WeaponSlot)> {
        if self.is_rotating() {
            return None;
        }
        let from = self.current_slot;
        let to = from.next(direction);
        self.begin_rotation(RotationTween::new(from, to, mount_rotation, duration));
        Some((from, to))
    }

    /// Installs a rotation tween and takes the rotation lock.
    ///
    /// Callers must check [`Turret::can_rotate`] first; starting a rotation
    /// while one is in flight is a bug and the new tween is dropped.
    pub fn begin_rotation(&mut self, tween: RotationTween) {
        if let Some(active) = &self.rotation {
            debug_assert!(
                false,
                "rotation to {:?} started while rotating to {:?}",
                tween.to_slot, active.to_slot
            );
            warn!(
                "ignoring rotation to {:?}: mount still rotating to {:?}",
                tween.to_slot, active.to_slot
            );
            return;
        }
        self.current_slot = tween.to_slot;
        self.rotation = Some(tween);
    }

    /// Advances the rotation in flight.
    ///
    /// # Returns
    /// What the mount should look like after this step
    pub fn tick_rotation(&mut self, delta: Duration) -> RotationStep {
        let Some(tween) = self.rotation.as_mut() else {
            return RotationStep::Idle;
        };
        tween.timer.tick(delta);
        if tween.timer.is_finished() {
            let slot = tween.to_slot;
            let rotation = tween.to;
            self.rotation = None;
            RotationStep::Finished { rotation, slot }
        } else {
            RotationStep::InFlight {
                rotation: tween.sample(),
            }
        }
    }

    /// Takes the fire lock for `duration`.
    pub fn start_cooldown(&mut self, duration: Duration) {
        self.cooldown = Some(Timer::new(duration, TimerMode::Once));
    }

    /// Advances the shot cooldown.
    ///
    /// # Returns
    /// `true` on the step that releases the fire lock
    pub fn tick_cooldown(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.cooldown.as_mut() else {
            return false;
        };
        timer.tick(delta);
        if timer.is_finished() {
            self.cooldown = None;
            true
        } else {
            false
        }
    }
}

/// Outcome of advancing a turret's rotation by one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationStep {
    /// No rotation in flight.
    Idle,
    /// Still turning; the mount should take this rotation.
    InFlight { rotation: Quat },
    /// Turn complete; the rotation lock has been released.
    Finished { rotation: Quat, slot: WeaponSlot },
}

/// A timed turn of the weapon mount from one slot to its neighbour.
///
/// Only the yaw changes; pitch and roll of the starting rotation are kept.
/// Interpolation takes the shortest arc with a quadratic ease-out.
#[derive(Reflect, Clone, Debug)]
pub struct RotationTween {
    pub from_slot: WeaponSlot,
    pub to_slot: WeaponSlot,
    pub from: Quat,
    pub to: Quat,
    pub timer: Timer,
}

impl RotationTween {
    pub fn new(from_slot: WeaponSlot, to_slot: WeaponSlot, from: Quat, duration: Duration) -> Self {
        let (_, pitch, roll) = from.to_euler(EulerRot::YXZ);
        let to = Quat::from_euler(EulerRot::YXZ, to_slot.yaw_radians(), pitch, roll);
        Self {
            from_slot,
            to_slot,
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    /// Eased completion in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.timer.duration().is_zero() {
            return 1.0;
        }
        ease_out_quad(self.timer.fraction())
    }

    /// Mount rotation at the current progress.
    pub fn sample(&self) -> Quat {
        self.from.slerp(self.to, self.progress())
    }
}

/// Quadratic ease-out: fast start, gentle arrival.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// What a weapon slot is wired to in the scene.
///
/// The slot's yaw is derived from the slot itself and is never configured.
///
/// # Fields
/// * `muzzle` - Entity whose global transform is the projectile spawn point
/// * `projectile` - Pool prefab fired from this slot
/// * `visuals` - Entities carrying a [`WeaponFade`] that show or hide with the slot
#[derive(Reflect, Clone, Debug)]
pub struct SlotBinding {
    pub muzzle: Entity,
    pub projectile: PrefabId,
    pub visuals: Vec<Entity>,
}

/// Per-slot bindings of a turret, indexed by [`WeaponSlot::index`].
#[derive(Component, Reflect, Clone, Debug, Default)]
#[reflect(Component)]
pub struct SlotBindings {
    bindings: [Option<SlotBinding>; 3],
}

impl SlotBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: bind a slot.
    pub fn with(mut self, slot: WeaponSlot, binding: SlotBinding) -> Self {
        self.bindings[slot.index()] = Some(binding);
        self
    }

    /// Binding configured for exactly this slot.
    pub fn get(&self, slot: WeaponSlot) -> Option<&SlotBinding> {
        self.bindings[slot.index()].as_ref()
    }

    /// Binding used when `slot` fires.
    ///
    /// An unbound slot falls back to the binding of [`WeaponSlot::DEFAULT`],
    /// the same slot an unknown mount orientation snaps to.
    pub fn resolve(&self, slot: WeaponSlot) -> Option<&SlotBinding> {
        self.get(slot).or_else(|| {
            debug!("{slot:?} is unbound; falling back to {:?}", WeaponSlot::DEFAULT);
            self.get(WeaponSlot::DEFAULT)
        })
    }
}

/// Opacity of one weapon visual, with an optional fade in flight.
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct WeaponFade {
    pub opacity: f32,
    fade: Option<OpacityFade>,
}

#[derive(Reflect, Clone, Debug)]
struct OpacityFade {
    from: f32,
    to: f32,
    timer: Timer,
}

impl Default for WeaponFade {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl WeaponFade {
    pub fn new(opacity: f32) -> Self {
        Self {
            opacity,
            fade: None,
        }
    }

    /// Starts a linear fade from the current opacity to `target`.
    ///
    /// A zero duration applies the target immediately.
    pub fn fade_to(&mut self, target: f32, duration: Duration) {
        if duration.is_zero() {
            self.opacity = target;
            self.fade = None;
            return;
        }
        self.fade = Some(OpacityFade {
            from: self.opacity,
            to: target,
            timer: Timer::new(duration, TimerMode::Once),
        });
    }

    /// Opacity the visual is heading to.
    pub fn target(&self) -> f32 {
        self.fade.as_ref().map_or(self.opacity, |fade| fade.to)
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Advances the fade; returns `true` when the opacity changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(fade) = self.fade.as_mut() else {
            return false;
        };
        fade.timer.tick(delta);
        self.opacity = fade.from + (fade.to - fade.from) * fade.timer.fraction();
        if fade.timer.is_finished() {
            self.opacity = fade.to;
            self.fade = None;
        }
        true
    }
}

/// A projectile in flight.
///
/// # Fields
/// * `velocity` - Launch velocity (impulse / mass), integrated directly when no physics engine runs
/// * `lifetime` - Time left before the projectile is returned to the pool
/// * `owner` - Turret that fired it
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct Projectile {
    pub velocity: Vec3,
    pub lifetime: Timer,
    pub owner: Option<Entity>,
}

impl Projectile {
    pub fn new(velocity: Vec3, lifetime: Duration) -> Self {
        Self {
            velocity,
            lifetime: Timer::new(lifetime, TimerMode::Once),
            owner: None,
        }
    }

    /// Builder pattern: set owner
    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Something worth points when hit.
///
/// # Fields
/// * `points` - Base award; doubled when the hitter's tag matches this target's
/// * `impact_effect` - Cosmetic prefab spawned where the target was hit
#[derive(Component, Reflect, Clone, Debug, Default)]
#[reflect(Component)]
pub struct Target {
    pub points: u32,
    pub impact_effect: Option<PrefabId>,
}

impl Target {
    pub fn new(points: u32) -> Self {
        Self {
            points,
            impact_effect: None,
        }
    }

    pub fn with_impact_effect(mut self, effect: PrefabId) -> Self {
        self.impact_effect = Some(effect);
        self
    }
}

/// Identity tag compared between target and hitter to detect perfect hits.
#[derive(Component, Reflect, Clone, Debug, PartialEq, Eq, Hash)]
#[reflect(Component)]
pub struct HitTag(pub String);

impl HitTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Marks an entity handed out by the [`crate::resources::ObjectPool`].
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq, Eq)]
#[reflect(Component)]
pub struct Pooled {
    pub prefab: PrefabId,
    /// `false` while parked in the pool
    pub active: bool,
}

/// Lifetime of a pooled cosmetic effect.
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct ImpactEffect {
    pub lifetime: Timer,
}

impl ImpactEffect {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime: Timer::new(lifetime, TimerMode::Once),
        }
    }
}
