//! VFX system - meshes for pooled prefabs, weapon fades and the score readout.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::components::{Pooled, WeaponFade};
use crate::resources::{ObjectPool, PrefabId};
use crate::systems::score::ScoreDisplay;

/// Render assets shared by every instance of a prefab.
#[derive(Resource, Default)]
pub struct TurretAssets {
    pub meshes: HashMap<PrefabId, Handle<Mesh>>,
    pub materials: HashMap<PrefabId, Handle<StandardMaterial>>,
}

/// Give every newly created pool entity its prefab's sphere mesh and material.
///
/// Reused entities keep the visuals they got the first time; the pool only
/// toggles their visibility.
pub fn attach_pooled_visuals(
    mut commands: Commands,
    pool: Res<ObjectPool>,
    mut assets: ResMut<TurretAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    added: Query<(Entity, &Pooled), Added<Pooled>>,
) {
    for (entity, pooled) in added.iter() {
        let Ok(prefab) = pool.prefab(pooled.prefab) else {
            continue;
        };
        let mesh = assets
            .meshes
            .entry(pooled.prefab)
            .or_insert_with(|| meshes.add(Sphere::new(prefab.radius)))
            .clone();
        let material = assets
            .materials
            .entry(pooled.prefab)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: prefab.color,
                    emissive: prefab.color.to_linear() * 0.5,
                    ..default()
                })
            })
            .clone();

        commands
            .entity(entity)
            .try_insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

/// Push weapon fade opacity into the material alpha.
///
/// Each faded visual needs a material of its own; a shared material would
/// fade every mesh using it.
pub fn sync_weapon_fades(
    mut materials: ResMut<Assets<StandardMaterial>>,
    fades: Query<(&WeaponFade, &MeshMaterial3d<StandardMaterial>), Changed<WeaponFade>>,
) {
    for (fade, material) in fades.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(fade.opacity);
            material.alpha_mode = if fade.opacity < 1.0 {
                AlphaMode::Blend
            } else {
                AlphaMode::Opaque
            };
        }
    }
}

/// Mirror the animated score into its UI text.
pub fn sync_score_text(mut displays: Query<(&ScoreDisplay, &mut Text), Changed<ScoreDisplay>>) {
    for (display, mut text) in displays.iter_mut() {
        if text.0 != display.text() {
            text.0 = display.text().to_string();
        }
    }
}
