//! Pooled object lifetimes - unspent projectiles and finished effects go back to the pool.

use bevy::prelude::*;

use crate::components::{ImpactEffect, Pooled, Projectile};
use crate::resources::ObjectPool;

/// Return an entity to the pool, or despawn it if it never came from one.
pub fn recycle(commands: &mut Commands, pool: &mut ObjectPool, entity: Entity, pooled: Option<&Pooled>) {
    match pooled {
        Some(pooled) => pool.release(commands, entity, pooled),
        None => commands.entity(entity).despawn(),
    }
}

/// Tick projectile lifetimes and recycle the ones that ran out.
pub fn expire_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut pool: ResMut<ObjectPool>,
    mut projectiles: Query<(Entity, &mut Projectile, Option<&Pooled>)>,
) {
    let delta = time.delta();
    for (entity, mut projectile, pooled) in projectiles.iter_mut() {
        projectile.lifetime.tick(delta);
        if projectile.lifetime.is_finished() {
            recycle(&mut commands, &mut pool, entity, pooled);
        }
    }
}

/// Tick hit-effect lifetimes and recycle the ones that ran out.
pub fn expire_impact_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut pool: ResMut<ObjectPool>,
    mut effects: Query<(Entity, &mut ImpactEffect, Option<&Pooled>)>,
) {
    let delta = time.delta();
    for (entity, mut effect, pooled) in effects.iter_mut() {
        effect.lifetime.tick(delta);
        if effect.lifetime.is_finished() {
            recycle(&mut commands, &mut pool, entity, pooled);
        }
    }
}

/// Move projectiles by their launch velocity when no physics engine drives them.
pub fn advance_projectiles(time: Res<Time>, mut projectiles: Query<(&Projectile, &mut Transform)>) {
    let dt = time.delta_secs();
    for (projectile, mut transform) in projectiles.iter_mut() {
        transform.translation += projectile.velocity * dt;
    }
}
