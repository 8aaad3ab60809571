//! Hit resolution - turns contacts between projectiles and targets into scored hits.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::components::{HitTag, ImpactEffect, Pooled, Projectile, Target};
use crate::config::TurretConfig;
use crate::events::{ContactEvent, HitEvent};
use crate::resources::ObjectPool;
use crate::systems::pool::recycle;

/// A hit is perfect when both sides carry the same tag.
///
/// A missing tag on either side never matches.
pub fn is_perfect_hit(target: Option<&HitTag>, other: Option<&HitTag>) -> bool {
    matches!((target, other), (Some(target), Some(other)) if target == other)
}

fn is_live(pooled: Option<&Pooled>) -> bool {
    pooled.is_none_or(|pooled| pooled.active)
}

/// Resolve contacts between live projectiles and targets.
///
/// Each resolved hit reports a [`HitEvent`], spawns the target's impact effect
/// at the target's position and recycles both participants. An entity takes
/// part in at most one hit per frame, so a second contact involving an already
/// consumed target or projectile is dropped. Contacts with parked pool
/// entities, or where neither side is a target, are ignored.
///
/// # Arguments
/// * `commands` - Bevy Commands for despawning and effect spawning
/// * `config` - Turret configuration (effect lifetime)
/// * `pool` - Pool the participants return to and effects come from
/// * `contacts` - Contacts detected this frame
/// * `hits` - Message writer for resolved hits
/// * `targets` - Query for target components
/// * `projectiles` - Query for live projectiles
/// * `consumed` - Entities already resolved this frame
pub fn resolve_contacts(
    mut commands: Commands,
    config: Res<TurretConfig>,
    mut pool: ResMut<ObjectPool>,
    mut contacts: MessageReader<ContactEvent>,
    mut hits: MessageWriter<HitEvent>,
    targets: Query<(&Target, &GlobalTransform, Option<&HitTag>, Option<&Pooled>)>,
    projectiles: Query<(Option<&HitTag>, Option<&Pooled>), With<Projectile>>,
    mut consumed: Local<HashSet<Entity>>,
) {
    consumed.clear();

    for contact in contacts.read() {
        let (target_entity, other_entity) = if targets.contains(contact.a) && projectiles.contains(contact.b) {
            (contact.a, contact.b)
        } else if targets.contains(contact.b) && projectiles.contains(contact.a) {
            (contact.b, contact.a)
        } else {
            continue;
        };
        if consumed.contains(&target_entity) || consumed.contains(&other_entity) {
            debug!("dropping contact {target_entity:?} <-> {other_entity:?}: already resolved this frame");
            continue;
        }

        let Ok((target, target_transform, target_tag, target_pooled)) = targets.get(target_entity) else {
            continue;
        };
        let Ok((other_tag, other_pooled)) = projectiles.get(other_entity) else {
            continue;
        };
        if !is_live(target_pooled) || !is_live(other_pooled) {
            continue;
        }

        let perfect = is_perfect_hit(target_tag, other_tag);
        let position = target_transform.translation();
        let hit = HitEvent {
            target: target_entity,
            other: other_entity,
            points: target.points,
            perfect,
            position,
        };
        debug!(
            "hit {target_entity:?} with {other_entity:?} for {} points (perfect: {perfect})",
            hit.award()
        );
        hits.write(hit);

        if let Some(effect) = target.impact_effect {
            match pool.spawn(&mut commands, effect, Transform::from_translation(position)) {
                Ok(entity) => {
                    commands.entity(entity).insert(ImpactEffect::new(config.effect_duration()));
                }
                Err(err) => warn!("no impact effect for {target_entity:?}: {err}"),
            }
        }

        recycle(&mut commands, &mut pool, target_entity, target_pooled);
        recycle(&mut commands, &mut pool, other_entity, other_pooled);
        consumed.insert(target_entity);
        consumed.insert(other_entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_tags_are_perfect() {
        let pinky = HitTag::new("Pinky");
        assert!(is_perfect_hit(Some(&pinky), Some(&HitTag::new("Pinky"))));
    }

    #[test]
    fn test_different_tags_are_not_perfect() {
        assert!(!is_perfect_hit(Some(&HitTag::new("Pinky")), Some(&HitTag::new("Giallo"))));
    }

    #[test]
    fn test_missing_tag_is_not_perfect() {
        let tag = HitTag::new("Fucsia");
        assert!(!is_perfect_hit(Some(&tag), None));
        assert!(!is_perfect_hit(None, Some(&tag)));
        assert!(!is_perfect_hit(None, None));
    }

    #[test]
    fn test_parked_entities_are_not_live() {
        let prefab = crate::resources::PrefabId(0);
        assert!(is_live(None));
        assert!(is_live(Some(&Pooled { prefab, active: true })));
        assert!(!is_live(Some(&Pooled { prefab, active: false })));
    }
}
