//! Headless game-loop scenarios: a turret with three bound slots, driven by messages.

#[cfg(test)]
mod turret_scenarios {
    use std::time::Duration;

    use bevy::ecs::message::{Message, MessageReader};
    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;
    use rotary_turret::prelude::*;
    use rotary_turret::systems::score::SCORE_PLACEHOLDER;

    const STEP: Duration = Duration::from_millis(50);

    #[derive(Resource)]
    struct Collected<T: Message>(Vec<T>);

    impl<T: Message> Default for Collected<T> {
        fn default() -> Self {
            Self(Vec::new())
        }
    }

    fn collect<T: Message + Clone>(mut reader: MessageReader<T>, mut collected: ResMut<Collected<T>>) {
        collected.0.extend(reader.read().cloned());
    }

    struct Scene {
        turret: Entity,
        mount: Entity,
        visuals: [Entity; 3],
        bolts: [PrefabId; 3],
        sparks: PrefabId,
    }

    fn test_app(config: TurretConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin))
            .insert_resource(config)
            .add_plugins(TurretCorePlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(STEP))
            .init_resource::<Collected<ShotFired>>()
            .init_resource::<Collected<HitEvent>>()
            .init_resource::<Collected<RotationFinished>>()
            .init_resource::<Collected<ScoreChanged>>()
            .add_systems(
                Update,
                (
                    collect::<ShotFired>,
                    collect::<HitEvent>,
                    collect::<RotationFinished>,
                    collect::<ScoreChanged>,
                )
                    .after(TurretSystems),
            );
        app
    }

    fn spawn_scene(app: &mut App) -> Scene {
        let world = app.world_mut();
        let (bolts, sparks) = {
            let mut pool = world.resource_mut::<ObjectPool>();
            let bolts = [
                pool.register(Prefab::projectile("Pinky bolt", "Pinky", 0.5)),
                pool.register(Prefab::projectile("Fucsia bolt", "Fucsia", 0.5)),
                pool.register(Prefab::projectile("Giallo bolt", "Giallo", 0.5)),
            ];
            (bolts, pool.register(Prefab::effect("Sparks")))
        };

        let turret = world.spawn(Transform::default()).id();
        let mount = world.spawn((Transform::default(), ChildOf(turret))).id();

        let mut bindings = SlotBindings::new();
        let mut visuals = [Entity::PLACEHOLDER; 3];
        for slot in WeaponSlot::ALL {
            let arm = Transform::from_rotation(Quat::from_rotation_y(-slot.yaw_radians()));
            let muzzle = world
                .spawn((arm * Transform::from_xyz(0.0, 0.0, 1.0), ChildOf(mount)))
                .id();
            let visual = world.spawn((WeaponFade::new(0.5), ChildOf(mount))).id();
            visuals[slot.index()] = visual;
            bindings = bindings.with(
                slot,
                SlotBinding {
                    muzzle,
                    projectile: bolts[slot.index()],
                    visuals: vec![visual],
                },
            );
        }
        world.entity_mut(turret).insert((Turret::new(mount), bindings));

        Scene {
            turret,
            mount,
            visuals,
            bolts,
            sparks,
        }
    }

    fn spawn_target(app: &mut App, points: u32, tag: &str, sparks: PrefabId, at: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Target::new(points).with_impact_effect(sparks),
                HitTag::new(tag),
                Transform::from_translation(at),
            ))
            .id()
    }

    /// Builds the app, spawns the scene and runs the zero-delta first frame.
    fn ready(config: TurretConfig) -> (App, Scene) {
        let mut app = test_app(config);
        let scene = spawn_scene(&mut app);
        app.update();
        (app, scene)
    }

    fn step(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn turret(app: &App, scene: &Scene) -> Turret {
        app.world().get::<Turret>(scene.turret).unwrap().clone()
    }

    fn shots(app: &App) -> Vec<ShotFired> {
        app.world().resource::<Collected<ShotFired>>().0.clone()
    }

    fn hits(app: &App) -> Vec<HitEvent> {
        app.world().resource::<Collected<HitEvent>>().0.clone()
    }

    fn fire_once(app: &mut App) -> ShotFired {
        let before = shots(app).len();
        app.world_mut().write_message(FireInput);
        app.update();
        let fired = shots(app);
        assert_eq!(fired.len(), before + 1, "shot was not fired");
        fired[before].clone()
    }

    #[test]
    fn test_new_turret_shows_only_facing_slot() {
        let (app, scene) = ready(TurretConfig::default());

        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Fucsia);
        let facing = app.world().get::<WeaponFade>(scene.visuals[WeaponSlot::Fucsia.index()]).unwrap();
        assert_eq!(facing.target(), 1.0);
        for slot in [WeaponSlot::Pinky, WeaponSlot::Giallo] {
            let hidden = app.world().get::<WeaponFade>(scene.visuals[slot.index()]).unwrap();
            assert_eq!(hidden.opacity, 0.0);
        }
    }

    #[test]
    fn test_rotate_right_locks_until_mount_lands_on_pinky() {
        let (mut app, scene) = ready(TurretConfig::default());

        app.world_mut().write_message(RotateInput::right());
        app.update();
        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Pinky);
        assert!(turret(&app, &scene).is_rotating());

        // a second request while the mount turns is dropped
        app.world_mut().write_message(RotateInput::right());
        step(&mut app, 4);
        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Pinky);
        assert!(turret(&app, &scene).is_rotating());

        step(&mut app, 7);
        assert!(!turret(&app, &scene).is_rotating());
        let mount = app.world().get::<Transform>(scene.mount).unwrap();
        assert_eq!(WeaponSlot::from_rotation(mount.rotation), WeaponSlot::Pinky);
        assert!((normalize_degrees(yaw_degrees(mount.rotation)) - 270.0).abs() < 1e-2);

        let finished = &app.world().resource::<Collected<RotationFinished>>().0;
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].slot, WeaponSlot::Pinky);

        let pinky = app.world().get::<WeaponFade>(scene.visuals[WeaponSlot::Pinky.index()]).unwrap();
        let fucsia = app.world().get::<WeaponFade>(scene.visuals[WeaponSlot::Fucsia.index()]).unwrap();
        assert_eq!(pinky.opacity, 1.0);
        assert_eq!(fucsia.opacity, 0.0);
    }

    #[test]
    fn test_left_then_right_returns_to_start() {
        let (mut app, scene) = ready(TurretConfig::default());

        app.world_mut().write_message(RotateInput::left());
        step(&mut app, 12);
        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Giallo);

        app.world_mut().write_message(RotateInput::right());
        step(&mut app, 12);
        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Fucsia);
        let mount = app.world().get::<Transform>(scene.mount).unwrap();
        assert_eq!(WeaponSlot::from_rotation(mount.rotation), WeaponSlot::Fucsia);
    }

    #[test]
    fn test_fire_is_gated_by_cooldown() {
        let (mut app, scene) = ready(TurretConfig::default());

        let shot = fire_once(&mut app);
        assert_eq!(shot.slot, WeaponSlot::Fucsia);
        assert_eq!(shot.prefab, scene.bolts[WeaponSlot::Fucsia.index()]);
        assert!(turret(&app, &scene).is_cooling());

        let projectile = app.world().get::<Projectile>(shot.projectile).unwrap();
        assert_eq!(projectile.owner, Some(scene.turret));
        assert!((projectile.velocity - Vec3::Z * 24.0).length() < 1e-3);
        assert_eq!(app.world().get::<HitTag>(shot.projectile).unwrap().as_str(), "Fucsia");
        assert!((shot.origin - Vec3::Z).length() < 1e-4);

        // two presses inside shoot_time yield one shot
        app.world_mut().write_message(FireInput);
        app.update();
        assert_eq!(shots(&app).len(), 1);

        step(&mut app, 4);
        assert!(!turret(&app, &scene).is_cooling());
        fire_once(&mut app);
    }

    #[test]
    fn test_fire_rejected_while_rotating() {
        let (mut app, scene) = ready(TurretConfig::default());

        app.world_mut().write_message(RotateInput::right());
        app.update();
        app.world_mut().write_message(FireInput);
        app.update();
        assert!(shots(&app).is_empty());
        assert!(!turret(&app, &scene).is_cooling());

        step(&mut app, 10);
        let shot = fire_once(&mut app);
        assert_eq!(shot.slot, WeaponSlot::Pinky);
        assert_eq!(shot.prefab, scene.bolts[WeaponSlot::Pinky.index()]);
    }

    #[test]
    fn test_aim_input_is_clamped() {
        let (mut app, scene) = ready(TurretConfig::default());

        app.world_mut().write_message(AimInput::new(Vec2::new(-1000.0, 1000.0)));
        app.update();
        let state = turret(&app, &scene);
        assert_eq!(state.aim_position, Vec2::new(4.0, 3.0));
        let transform = app.world().get::<Transform>(scene.turret).unwrap();
        assert_eq!(transform.translation.truncate(), Vec2::new(4.0, 3.0));

        app.world_mut().write_message(AimInput::new(Vec2::new(100.0, -50.0)));
        app.update();
        let moved = turret(&app, &scene).aim_position;
        assert!((moved - Vec2::new(3.0, 2.5)).length() < 1e-4);
    }

    #[test]
    fn test_aim_starts_from_placed_position() {
        let mut app = test_app(TurretConfig::default());
        let scene = spawn_scene(&mut app);
        app.world_mut()
            .get_mut::<Transform>(scene.turret)
            .unwrap()
            .translation = Vec3::new(3.0, 2.0, 0.5);
        app.update();
        assert_eq!(turret(&app, &scene).aim_position, Vec2::new(3.0, 2.0));

        app.world_mut().write_message(AimInput::new(Vec2::ZERO));
        app.update();
        assert_eq!(turret(&app, &scene).aim_position, Vec2::new(3.0, 2.0));
        let transform = app.world().get::<Transform>(scene.turret).unwrap();
        assert_eq!(transform.translation, Vec3::new(3.0, 2.0, 0.5));
    }

    #[test]
    fn test_aim_start_outside_bounds_is_clamped() {
        let mut app = test_app(TurretConfig::default());
        let scene = spawn_scene(&mut app);
        app.world_mut()
            .get_mut::<Transform>(scene.turret)
            .unwrap()
            .translation = Vec3::new(9.0, -5.0, 0.0);
        app.update();
        assert_eq!(turret(&app, &scene).aim_position, Vec2::new(4.0, -2.0));
    }

    #[test]
    fn test_unconvertible_config_durations_use_defaults() {
        let config = TurretConfig {
            rotation_time: 1e30,
            shoot_time: -1.0,
            ..default()
        };
        let (mut app, scene) = ready(config);

        app.world_mut().write_message(RotateInput::right());
        step(&mut app, 12);
        assert!(!turret(&app, &scene).is_rotating());
        assert_eq!(turret(&app, &scene).current_slot, WeaponSlot::Pinky);

        fire_once(&mut app);
        assert!(turret(&app, &scene).is_cooling());
        step(&mut app, 5);
        assert!(!turret(&app, &scene).is_cooling());
    }

    #[test]
    fn test_matching_tag_scores_double_and_recycles_participants() {
        let (mut app, scene) = ready(TurretConfig::default());
        let target = spawn_target(&mut app, 10, "Fucsia", scene.sparks, Vec3::new(0.0, 1.0, 5.0));
        app.update();

        let shot = fire_once(&mut app);
        app.world_mut().write_message(ContactEvent {
            a: shot.projectile,
            b: target,
        });
        app.update();

        let resolved = hits(&app);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].perfect);
        assert_eq!(resolved[0].target, target);
        assert_eq!(app.world().resource::<Scoreboard>().total(), 20);
        assert_eq!(
            app.world().resource::<Collected<ScoreChanged>>().0,
            vec![ScoreChanged { total: 20 }]
        );

        assert!(app.world().get::<Target>(target).is_none());
        let pooled = app.world().get::<Pooled>(shot.projectile).unwrap();
        assert!(!pooled.active);
        assert!(app.world().get::<Projectile>(shot.projectile).is_none());
        assert_eq!(app.world().resource::<ObjectPool>().idle_count(shot.prefab), 1);

        let mut effects = app.world_mut().query::<(&ImpactEffect, &Transform)>();
        let spawned: Vec<Vec3> = effects.iter(app.world()).map(|(_, t)| t.translation).collect();
        assert_eq!(spawned, vec![Vec3::new(0.0, 1.0, 5.0)]);
    }

    #[test]
    fn test_different_tag_scores_base_points_with_reused_projectile() {
        let (mut app, scene) = ready(TurretConfig::default());
        let first = spawn_target(&mut app, 10, "Fucsia", scene.sparks, Vec3::ZERO);
        let second = spawn_target(&mut app, 10, "Giallo", scene.sparks, Vec3::X);
        app.update();

        let shot = fire_once(&mut app);
        app.world_mut().write_message(ContactEvent {
            a: first,
            b: shot.projectile,
        });
        step(&mut app, 5);

        let reused = fire_once(&mut app);
        assert_eq!(reused.projectile, shot.projectile);
        app.world_mut().write_message(ContactEvent {
            a: reused.projectile,
            b: second,
        });
        app.update();

        let resolved = hits(&app);
        assert_eq!(resolved.len(), 2);
        assert!(!resolved[1].perfect);
        assert_eq!(app.world().resource::<Scoreboard>().total(), 30);
    }

    #[test]
    fn test_repeated_contacts_award_once() {
        let (mut app, scene) = ready(TurretConfig::default());
        let target = spawn_target(&mut app, 7, "Pinky", scene.sparks, Vec3::ZERO);
        let bystander = spawn_target(&mut app, 7, "Pinky", scene.sparks, Vec3::Y);
        app.update();

        let shot = fire_once(&mut app);
        app.world_mut().write_message(ContactEvent {
            a: shot.projectile,
            b: target,
        });
        app.world_mut().write_message(ContactEvent {
            a: target,
            b: shot.projectile,
        });
        app.world_mut().write_message(ContactEvent {
            a: shot.projectile,
            b: bystander,
        });
        // neither side is a projectile
        app.world_mut().write_message(ContactEvent {
            a: target,
            b: bystander,
        });
        app.update();

        assert_eq!(hits(&app).len(), 1);
        assert_eq!(app.world().resource::<Scoreboard>().total(), 7);
        assert!(app.world().get::<Target>(bystander).is_some());
    }

    #[test]
    fn test_unspent_projectile_returns_to_pool() {
        let config = TurretConfig {
            projectile_lifetime: 0.1,
            ..default()
        };
        let (mut app, scene) = ready(config);

        let shot = fire_once(&mut app);
        let start = app.world().get::<Transform>(shot.projectile).unwrap().translation;
        app.update();
        let moved = app.world().get::<Transform>(shot.projectile).unwrap().translation;
        assert!(moved.z > start.z);

        step(&mut app, 2);
        assert!(!app.world().get::<Pooled>(shot.projectile).unwrap().active);
        assert_eq!(
            app.world().get::<Visibility>(shot.projectile),
            Some(&Visibility::Hidden)
        );
        assert_eq!(
            app.world()
                .resource::<ObjectPool>()
                .idle_count(scene.bolts[WeaponSlot::Fucsia.index()]),
            1
        );
    }

    #[test]
    fn test_impact_effect_expires() {
        let config = TurretConfig {
            effect_lifetime: 0.1,
            ..default()
        };
        let (mut app, scene) = ready(config);
        let target = spawn_target(&mut app, 1, "Giallo", scene.sparks, Vec3::ZERO);
        app.update();

        let shot = fire_once(&mut app);
        app.world_mut().write_message(ContactEvent {
            a: shot.projectile,
            b: target,
        });
        app.update();
        step(&mut app, 3);

        let mut effects = app.world_mut().query::<&ImpactEffect>();
        assert_eq!(effects.iter(app.world()).count(), 0);
        assert_eq!(app.world().resource::<ObjectPool>().idle_count(scene.sparks), 1);
    }

    #[test]
    fn test_score_display_reveals_new_total() {
        let (mut app, scene) = ready(TurretConfig::default());
        let display = app.world_mut().spawn(ScoreDisplay::default()).id();
        let target = spawn_target(&mut app, 10, "Fucsia", scene.sparks, Vec3::ZERO);
        app.update();
        assert_eq!(app.world().get::<ScoreDisplay>(display).unwrap().text(), SCORE_PLACEHOLDER);

        let shot = fire_once(&mut app);
        app.world_mut().write_message(ContactEvent {
            a: shot.projectile,
            b: target,
        });
        app.update();
        assert_eq!(app.world().get::<ScoreDisplay>(display).unwrap().target(), "20");

        step(&mut app, 5);
        let shown = app.world().get::<ScoreDisplay>(display).unwrap();
        assert!(!shown.is_revealing());
        assert_eq!(shown.text(), "20");
    }
}
