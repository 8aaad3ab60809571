use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rotary_turret::prelude::*;
use std::time::Duration;

/// Scripted inputs: (seconds since start, action).
const SCRIPT: &[(f32, Action)] = &[
    (0.5, Action::Fire),
    (0.6, Action::Fire),
    (1.0, Action::Rotate(RotateDirection::Right)),
    (1.2, Action::Fire),
    (1.8, Action::Fire),
    (2.4, Action::Rotate(RotateDirection::Right)),
    (3.2, Action::Aim(Vec2::new(-50.0, 0.0))),
    (3.4, Action::Fire),
];

const HIT_RADIUS: f32 = 0.5;

#[derive(Clone, Copy)]
enum Action {
    Aim(Vec2),
    Rotate(RotateDirection),
    Fire,
}

fn main() {
    println!("Starting Headless Turret Simulation...");
    println!("A scripted player shoots at three tagged targets for 5 seconds...");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .add_plugins(TransformPlugin)
        .add_plugins(TurretCorePlugin)
        // Skip input, VFX and debug plugins (headless)
        .add_systems(Startup, setup_simulation)
        .add_systems(Update, (play_script, detect_proximity).before(TurretSystems))
        .add_systems(Update, (report_events, print_progress).after(TurretSystems))
        .run();
}

fn setup_simulation(mut commands: Commands, mut pool: ResMut<ObjectPool>) {
    println!("\n[SETUP] Registering prefabs and spawning the turret...");

    let bolts = [
        pool.register(Prefab::projectile("Pinky bolt", "Pinky", 0.5)),
        pool.register(Prefab::projectile("Fucsia bolt", "Fucsia", 0.5)),
        pool.register(Prefab::projectile("Giallo bolt", "Giallo", 0.5)),
    ];
    let sparks = pool.register(Prefab::effect("Sparks"));

    let turret = commands.spawn((Transform::default(), Name::new("Turret"))).id();
    let mount = commands
        .spawn((Transform::default(), Name::new("Mount"), ChildOf(turret)))
        .id();

    let mut bindings = SlotBindings::new();
    for slot in WeaponSlot::ALL {
        // each muzzle points down +Z while its slot faces the player
        let arm = Transform::from_rotation(Quat::from_rotation_y(-slot.yaw_radians()));
        let muzzle = commands
            .spawn((
                arm * Transform::from_xyz(0.0, 0.0, 1.0),
                Name::new(format!("{slot:?} muzzle")),
                ChildOf(mount),
            ))
            .id();
        bindings = bindings.with(
            slot,
            SlotBinding {
                muzzle,
                projectile: bolts[slot.index()],
                visuals: Vec::new(),
            },
        );
    }
    commands.entity(turret).insert((Turret::new(mount), bindings));

    for (z, tag) in [(6.0, "Fucsia"), (9.0, "Pinky"), (12.0, "Fucsia")] {
        commands.spawn((
            Target::new(10).with_impact_effect(sparks),
            HitTag::new(tag),
            Transform::from_xyz(0.0, 0.0, z),
            Name::new(format!("{tag} target")),
        ));
    }
    commands.spawn((
        Target::new(5).with_impact_effect(sparks),
        HitTag::new("Giallo"),
        Transform::from_xyz(0.5, 0.0, 6.0),
        Name::new("Side target"),
    ));
}

fn play_script(
    time: Res<Time>,
    mut next: Local<usize>,
    mut aims: MessageWriter<AimInput>,
    mut rotations: MessageWriter<RotateInput>,
    mut shots: MessageWriter<FireInput>,
) {
    while let Some((at, action)) = SCRIPT.get(*next) {
        if time.elapsed_secs() < *at {
            break;
        }
        match action {
            Action::Aim(delta) => {
                aims.write(AimInput::new(*delta));
            }
            Action::Rotate(direction) => {
                rotations.write(RotateInput {
                    direction: *direction,
                });
            }
            Action::Fire => {
                shots.write(FireInput);
            }
        }
        *next += 1;
    }
}

/// Stand-in for a physics engine: report projectiles passing close to a target.
fn detect_proximity(
    projectiles: Query<(Entity, &GlobalTransform), With<Projectile>>,
    targets: Query<(Entity, &GlobalTransform), With<Target>>,
    mut contacts: MessageWriter<ContactEvent>,
) {
    for (projectile, projectile_transform) in projectiles.iter() {
        for (target, target_transform) in targets.iter() {
            let distance = projectile_transform
                .translation()
                .distance(target_transform.translation());
            if distance < HIT_RADIUS {
                contacts.write(ContactEvent {
                    a: projectile,
                    b: target,
                });
            }
        }
    }
}

fn report_events(
    mut shots: MessageReader<ShotFired>,
    mut rotations: MessageReader<RotationFinished>,
    mut hits: MessageReader<HitEvent>,
    mut scores: MessageReader<ScoreChanged>,
) {
    for shot in shots.read() {
        println!("[FIRE] {:?} slot fired from {:.2}", shot.slot, shot.origin);
    }
    for rotation in rotations.read() {
        println!("[ROTATE] Mount settled on {:?}", rotation.slot);
    }
    for hit in hits.read() {
        let verdict = if hit.perfect { "PERFECT" } else { "hit" };
        println!("[HIT] {verdict} at {:.2} for {} points", hit.position, hit.award());
    }
    for score in scores.read() {
        println!("[SCORE] Total {}", score.total);
    }
}

fn print_progress(time: Res<Time>, scoreboard: Res<Scoreboard>, mut exit: MessageWriter<AppExit>) {
    // Auto-quit after 5 seconds
    if time.elapsed_secs() > 5.0 {
        println!("[FINISHED] Simulation complete. Final score: {}", scoreboard.total());
        exit.write(AppExit::Success);
    }
}
