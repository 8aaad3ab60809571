//! Physics bridge - rigid bodies for pooled projectiles and contact forwarding.
//!
//! Everything touching avian is compiled only with the `dim3` feature and runs
//! only when a physics pipeline exists, so the core systems work headless.

#[cfg(feature = "dim3")]
use bevy::prelude::*;

#[cfg(feature = "dim3")]
use avian3d::prelude::*;
#[cfg(feature = "dim3")]
use bevy::ecs::message::{MessageReader, MessageWriter};

#[cfg(feature = "dim3")]
use crate::components::{Pooled, Projectile};
#[cfg(feature = "dim3")]
use crate::events::ContactEvent;
#[cfg(feature = "dim3")]
use crate::resources::ObjectPool;

/// Run condition: a physics engine is simulating the world.
#[cfg(feature = "dim3")]
pub fn physics_active(pipeline: Option<Res<SpatialQueryPipeline>>) -> bool {
    pipeline.is_some()
}

/// Run condition: a physics engine is simulating the world.
#[cfg(not(feature = "dim3"))]
pub fn physics_active() -> bool {
    false
}

/// Keep pooled projectile bodies in step with their pool state.
///
/// Parked entities are taken out of the simulation. Reactivated projectiles
/// get a dynamic sphere body (created on first use) launched at their
/// `Projectile::velocity`, which already folds in the shot impulse and mass.
#[cfg(feature = "dim3")]
pub fn sync_pooled_bodies(
    mut commands: Commands,
    pool: Res<ObjectPool>,
    changed: Query<(Entity, &Pooled, Option<&Projectile>, Has<RigidBody>), Changed<Pooled>>,
) {
    for (entity, pooled, projectile, has_body) in changed.iter() {
        if !pooled.active {
            if has_body {
                commands
                    .entity(entity)
                    .insert((RigidBodyDisabled, ColliderDisabled, LinearVelocity::ZERO));
            }
            continue;
        }

        let Some(projectile) = projectile else {
            continue;
        };
        let Ok(prefab) = pool.prefab(pooled.prefab) else {
            continue;
        };
        let Some(mass) = prefab.mass() else {
            continue;
        };

        let mut entity_commands = commands.entity(entity);
        if has_body {
            entity_commands.remove::<(RigidBodyDisabled, ColliderDisabled)>();
        } else {
            entity_commands.insert((
                RigidBody::Dynamic,
                Collider::sphere(prefab.radius),
                CollisionEventsEnabled,
                Mass(mass),
                GravityScale(0.0),
            ));
        }
        entity_commands.insert((
            LinearVelocity(projectile.velocity),
            AngularVelocity::ZERO,
        ));
    }
}

/// Forward avian collision starts as turret contacts.
#[cfg(feature = "dim3")]
pub fn forward_collision_starts(
    mut collisions: MessageReader<CollisionStart>,
    mut contacts: MessageWriter<ContactEvent>,
) {
    for collision in collisions.read() {
        contacts.write(ContactEvent {
            a: collision.collider1,
            b: collision.collider2,
        });
    }
}
