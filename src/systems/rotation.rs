//! Rotation animator - turns the weapon mount between slots and cross-fades the weapons.
//!
//! The rotation lock lives in [`Turret`]: it is taken when a rotate input is
//! accepted and released by [`animate_rotations`] on the frame the tween's
//! timer finishes. Rotate inputs that arrive in between are dropped.

use std::time::Duration;

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{RotationStep, SlotBindings, Turret, WeaponFade};
use crate::config::TurretConfig;
use crate::events::{RotateInput, RotationFinished};
use crate::types::WeaponSlot;

/// Derive the starting state of newly spawned turrets from the scene.
///
/// The aim position starts at the turret's own x/y, clamped to the aim
/// bounds, and the slot comes from the mount's yaw. The starting slot's
/// visuals fade in over `rotation_time`; the other slots are hidden
/// immediately.
pub fn initialize_turrets(
    config: Res<TurretConfig>,
    mut turrets: Query<(Entity, &mut Turret, Option<&SlotBindings>), Added<Turret>>,
    transforms: Query<&Transform>,
    mut fades: Query<&mut WeaponFade>,
) {
    for (entity, mut turret, bindings) in turrets.iter_mut() {
        if let Ok(transform) = transforms.get(entity) {
            turret.aim_position = transform
                .translation
                .truncate()
                .clamp(config.min_bounds, config.max_bounds);
        }
        turret.current_slot = match transforms.get(turret.mount) {
            Ok(mount) => WeaponSlot::from_rotation(mount.rotation),
            Err(_) => {
                warn!("turret {entity:?} has no mount transform; starting on {:?}", WeaponSlot::DEFAULT);
                WeaponSlot::DEFAULT
            }
        };
        info!(
            "turret {entity:?} ready on {:?} at {}",
            turret.current_slot, turret.aim_position
        );

        let Some(bindings) = bindings else {
            continue;
        };
        let fade_in = config.rotation_duration();
        for slot in WeaponSlot::ALL {
            let Some(binding) = bindings.get(slot) else {
                continue;
            };
            for &visual in &binding.visuals {
                let Ok(mut fade) = fades.get_mut(visual) else {
                    continue;
                };
                if slot == turret.current_slot {
                    fade.fade_to(1.0, fade_in);
                } else {
                    fade.fade_to(0.0, Duration::ZERO);
                }
            }
        }
    }
}

/// Start mount rotations for accepted rotate inputs.
///
/// The slot switches immediately; the mount and the weapon opacities catch up
/// over `rotation_time`.
pub fn handle_rotate_input(
    config: Res<TurretConfig>,
    mut rotate_inputs: MessageReader<RotateInput>,
    mut turrets: Query<(Entity, &mut Turret, Option<&SlotBindings>)>,
    mounts: Query<&Transform>,
    mut fades: Query<&mut WeaponFade>,
) {
    let duration = config.rotation_duration();

    for input in rotate_inputs.read() {
        for (entity, mut turret, bindings) in turrets.iter_mut() {
            let Ok(mount) = mounts.get(turret.mount) else {
                warn!("turret {entity:?} lost its mount {:?}", turret.mount);
                continue;
            };
            let Some((from, to)) = turret.request_rotation(input.direction, mount.rotation, duration)
            else {
                debug!("turret {entity:?}: rotate {:?} rejected, mount still turning", input.direction);
                continue;
            };
            debug!("turret {entity:?}: rotating {:?} from {from:?} to {to:?}", input.direction);

            let Some(bindings) = bindings else {
                continue;
            };
            cross_fade(bindings, from, to, duration, &mut fades);
        }
    }
}

/// Fade `from`'s visuals out and `to`'s visuals in over the same duration.
fn cross_fade(
    bindings: &SlotBindings,
    from: WeaponSlot,
    to: WeaponSlot,
    duration: Duration,
    fades: &mut Query<&mut WeaponFade>,
) {
    for (slot, target) in [(from, 0.0), (to, 1.0)] {
        let Some(binding) = bindings.get(slot) else {
            continue;
        };
        for &visual in &binding.visuals {
            if let Ok(mut fade) = fades.get_mut(visual) {
                fade.fade_to(target, duration);
            }
        }
    }
}

/// Advance mount rotations and release the rotation lock when they complete.
pub fn animate_rotations(
    time: Res<Time>,
    mut finished: MessageWriter<RotationFinished>,
    mut turrets: Query<(Entity, &mut Turret)>,
    mut mounts: Query<&mut Transform>,
) {
    let delta = time.delta();

    for (entity, mut turret) in turrets.iter_mut() {
        let mount = turret.mount;
        match turret.tick_rotation(delta) {
            RotationStep::Idle => {}
            RotationStep::InFlight { rotation } => {
                if let Ok(mut transform) = mounts.get_mut(mount) {
                    transform.rotation = rotation;
                }
            }
            RotationStep::Finished { rotation, slot } => {
                if let Ok(mut transform) = mounts.get_mut(mount) {
                    transform.rotation = rotation;
                }
                debug!("turret {entity:?}: rotation to {slot:?} complete");
                finished.write(RotationFinished {
                    turret: entity,
                    slot,
                });
            }
        }
    }
}

/// Advance weapon opacity fades.
pub fn animate_weapon_fades(time: Res<Time>, mut fades: Query<&mut WeaponFade>) {
    let delta = time.delta();
    for mut fade in fades.iter_mut() {
        if fade.is_fading() {
            fade.tick(delta);
        }
    }
}
