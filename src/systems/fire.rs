//! Fire control - cooldown-gated shots from the slot facing the player.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{Projectile, SlotBindings, Turret};
use crate::config::TurretConfig;
use crate::events::{FireInput, ShotFired};
use crate::resources::ObjectPool;

/// Attempt a shot from one turret.
///
/// Both locks are checked before anything else happens. On success the slot's
/// projectile prefab is taken from the pool at the muzzle position (identity
/// rotation) and launched along the muzzle's back axis with an impulse of
/// `shoot_force`, and the fire lock is taken for `shoot_time`.
///
/// # Arguments
/// * `commands` - Bevy Commands for the pool spawn
/// * `pool` - Pool the projectile is taken from
/// * `config` - Turret configuration (force, cooldown, lifetime)
/// * `entity` - The turret entity
/// * `turret` - The turret's state
/// * `bindings` - The turret's slot bindings
/// * `muzzles` - Query for muzzle global transforms
///
/// # Returns
/// The shot that was fired, or `None` when the turret is locked or misconfigured
pub fn try_fire(
    commands: &mut Commands,
    pool: &mut ObjectPool,
    config: &TurretConfig,
    entity: Entity,
    turret: &mut Turret,
    bindings: &SlotBindings,
    muzzles: &Query<&GlobalTransform>,
) -> Option<ShotFired> {
    if !turret.can_fire() {
        debug!(
            "turret {entity:?}: fire rejected (rotating: {}, cooling: {})",
            turret.is_rotating(),
            turret.is_cooling()
        );
        return None;
    }

    let slot = turret.current_slot;
    let Some(binding) = bindings.resolve(slot) else {
        warn!("turret {entity:?}: no binding for {slot:?} or the default slot");
        return None;
    };
    let Ok(muzzle) = muzzles.get(binding.muzzle) else {
        warn!("turret {entity:?}: muzzle {:?} of {slot:?} is gone", binding.muzzle);
        return None;
    };
    let mass = match pool.prefab(binding.projectile) {
        Ok(prefab) => match prefab.mass() {
            Some(mass) => mass.max(f32::EPSILON),
            None => {
                warn!("turret {entity:?}: prefab '{}' is not a projectile", prefab.name);
                return None;
            }
        },
        Err(err) => {
            warn!("turret {entity:?}: {err}");
            return None;
        }
    };

    let origin = muzzle.translation();
    let projectile = match pool.spawn(commands, binding.projectile, Transform::from_translation(origin)) {
        Ok(projectile) => projectile,
        Err(err) => {
            warn!("turret {entity:?}: {err}");
            return None;
        }
    };

    let impulse = *muzzle.back() * config.shoot_force;
    commands.entity(projectile).insert(
        Projectile::new(impulse / mass, config.projectile_duration()).with_owner(entity),
    );
    turret.start_cooldown(config.shoot_duration());

    Some(ShotFired {
        turret: entity,
        slot,
        prefab: binding.projectile,
        projectile,
        origin,
        impulse,
    })
}

/// Handle fire inputs for every turret.
pub fn handle_fire_input(
    mut commands: Commands,
    config: Res<TurretConfig>,
    mut pool: ResMut<ObjectPool>,
    mut fire_inputs: MessageReader<FireInput>,
    mut shots: MessageWriter<ShotFired>,
    mut turrets: Query<(Entity, &mut Turret, &SlotBindings)>,
    muzzles: Query<&GlobalTransform>,
) {
    for _ in fire_inputs.read() {
        for (entity, mut turret, bindings) in turrets.iter_mut() {
            if let Some(shot) = try_fire(
                &mut commands,
                &mut pool,
                &config,
                entity,
                &mut turret,
                bindings,
                &muzzles,
            ) {
                debug!("turret {entity:?}: fired {:?} from {:?}", shot.prefab, shot.slot);
                shots.write(shot);
            }
        }
    }
}

/// Release fire locks whose cooldown has run out.
pub fn tick_fire_cooldowns(time: Res<Time>, mut turrets: Query<(Entity, &mut Turret)>) {
    let delta = time.delta();
    for (entity, mut turret) in turrets.iter_mut() {
        if !turret.is_cooling() {
            continue;
        }
        if turret.tick_cooldown(delta) {
            debug!("turret {entity:?}: ready to fire");
        }
    }
}
