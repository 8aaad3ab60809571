use avian3d::prelude::*;
use bevy::color::palettes::tailwind;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use rand::seq::IndexedRandom;
use rand_distr::{Distribution, Normal};
use rotary_turret::prelude::*;
use rotary_turret::systems::score::SCORE_PLACEHOLDER;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(TurretPluginGroup)
        .insert_resource(Gravity(Vec3::ZERO))
        .add_systems(Startup, (spawn_turret, spawn_targets, spawn_lights, spawn_ui))
        .add_systems(Update, respawn_targets.after(TurretSystems))
        .run();
}

const TAGS: [(&str, Srgba); 3] = [
    ("Pinky", tailwind::PINK_400),
    ("Fucsia", tailwind::FUCHSIA_500),
    ("Giallo", tailwind::YELLOW_400),
];

const TARGET_DEPTH: f32 = 14.0;

#[derive(Resource)]
struct RangeAssets {
    target_mesh: Handle<Mesh>,
    target_materials: Vec<Handle<StandardMaterial>>,
    sparks: PrefabId,
}

fn tag_color(tag: &str) -> Color {
    TAGS.iter()
        .find(|(name, _)| *name == tag)
        .map_or(Color::WHITE, |(_, color)| (*color).into())
}

fn spawn_turret(
    mut commands: Commands,
    mut pool: ResMut<ObjectPool>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, -7.0).looking_at(Vec3::new(0.0, 0.0, TARGET_DEPTH), Vec3::Y),
    ));

    let bolts: Vec<PrefabId> = WeaponSlot::ALL
        .iter()
        .map(|slot| {
            let (tag, _) = TAGS[slot.index()];
            pool.register(
                Prefab::projectile(format!("{tag} bolt"), tag, 0.5)
                    .with_radius(0.15)
                    .with_color(tag_color(tag)),
            )
        })
        .collect();
    let sparks = pool.register(Prefab::effect("Sparks"));

    let body_mesh = meshes.add(Cylinder::new(0.6, 0.4));
    let barrel_mesh = meshes.add(Cuboid::new(0.2, 0.2, 1.0));
    let body_material = materials.add(Color::from(tailwind::SLATE_500));

    let turret = commands
        .spawn((
            Mesh3d(body_mesh),
            MeshMaterial3d(body_material),
            Transform::default(),
            Name::new("Turret"),
        ))
        .id();
    let mount = commands
        .spawn((
            Transform::from_xyz(0.0, 0.3, 0.0),
            Visibility::default(),
            Name::new("Mount"),
            ChildOf(turret),
        ))
        .id();

    let mut bindings = SlotBindings::new();
    for slot in WeaponSlot::ALL {
        let (tag, _) = TAGS[slot.index()];
        let arm = Transform::from_rotation(Quat::from_rotation_y(-slot.yaw_radians()));
        // each visual owns its material so the fades stay independent
        let barrel_material = materials.add(StandardMaterial {
            base_color: tag_color(tag),
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        let barrel = commands
            .spawn((
                Mesh3d(barrel_mesh.clone()),
                MeshMaterial3d(barrel_material),
                arm * Transform::from_xyz(0.0, 0.0, 0.5),
                WeaponFade::default(),
                ChildOf(mount),
            ))
            .id();
        let muzzle = commands
            .spawn((
                arm * Transform::from_xyz(0.0, 0.0, 1.2),
                Name::new(format!("{slot:?} muzzle")),
                ChildOf(mount),
            ))
            .id();
        bindings = bindings.with(
            slot,
            SlotBinding {
                muzzle,
                projectile: bolts[slot.index()],
                visuals: vec![barrel],
            },
        );
    }
    commands.entity(turret).insert((Turret::new(mount), bindings));

    commands.insert_resource(RangeAssets {
        target_mesh: meshes.add(Sphere::new(0.5)),
        target_materials: TAGS
            .iter()
            .map(|(_, color)| materials.add(Color::from(*color)))
            .collect(),
        sparks,
    });
}

fn spawn_target(commands: &mut Commands, assets: &RangeAssets, tag_index: usize, position: Vec3) {
    let (tag, _) = TAGS[tag_index];
    commands.spawn((
        Mesh3d(assets.target_mesh.clone()),
        MeshMaterial3d(assets.target_materials[tag_index].clone()),
        Transform::from_translation(position),
        Target::new(10).with_impact_effect(assets.sparks),
        HitTag::new(tag),
        RigidBody::Static,
        Collider::sphere(0.5),
        Sensor,
        CollisionEventsEnabled,
        Name::new(format!("{tag} target")),
    ));
}

fn spawn_targets(mut commands: Commands, assets: Res<RangeAssets>) {
    for (i, x) in [-3.0, 0.0, 3.0].into_iter().enumerate() {
        spawn_target(&mut commands, &assets, i, Vec3::new(x, 0.5, TARGET_DEPTH));
    }
}

/// Replace every destroyed target with a random one somewhere down the range.
fn respawn_targets(
    mut commands: Commands,
    mut hits: MessageReader<HitEvent>,
    assets: Option<Res<RangeAssets>>,
    config: Res<TurretConfig>,
) {
    let Some(assets) = assets else {
        return;
    };
    let mut rng = rand::rng();
    let lateral = Normal::new(0.0, 2.0).ok();
    let indices = [0, 1, 2];

    for _ in hits.read() {
        let x: f32 = lateral.map_or(0.0, |normal| normal.sample(&mut rng));
        let x = x.clamp(config.min_bounds.x, config.max_bounds.x);
        let y = rand::Rng::random_range(&mut rng, config.min_bounds.y..=config.max_bounds.y);
        let tag_index = indices.choose(&mut rng).copied().unwrap_or(0);
        spawn_target(&mut commands, &assets, tag_index, Vec3::new(x, y.max(0.5), TARGET_DEPTH));
    }
}

fn spawn_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(20.0)),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(SCORE_PLACEHOLDER),
                TextFont::from_font_size(32.0),
                TextColor(tailwind::AMBER_300.into()),
                ScoreDisplay::default(),
            ));

            parent.spawn((
                Text::new("MOUSE: Aim | Q/E: Rotate | LCLICK/SPACE: Shoot | ESC: Release cursor"),
                TextFont::from_font_size(16.0),
                TextColor(tailwind::GRAY_400.into()),
            ));
        });
}
