//! # Rotary Turret
//!
//! A player-controlled turret with three rotating weapon slots, for Bevy 0.18.
//!
//! ## Features
//! - Mouse aiming clamped to a rectangle
//! - Three weapon slots on a rotating mount, each firing its own projectile
//! - Independent rotation and fire locks
//! - Perfect hits (matching tags) score double
//! - Object pooling for projectiles and hit effects
//! - Optional avian3d rigid bodies via the `dim3` feature
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use rotary_turret::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TurretPluginGroup)
//!         .run();
//! }
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
pub mod types;

pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::TurretConfig;
    pub use crate::error::{TurretError, TurretResult};
    pub use crate::events::*;
    pub use crate::resources::*;
    pub use crate::systems::score::ScoreDisplay;
    pub use crate::types::*;
    pub use crate::TurretPluginGroup;
    pub use crate::TurretSystems;
    pub use crate::{TurretCorePlugin, TurretDebugPlugin, TurretInputPlugin, TurretVfxPlugin};
}

use bevy::prelude::*;

/// Main plugin group that includes all turret subsystems.
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use rotary_turret::prelude::*;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(TurretPluginGroup)
///         .run();
/// }
/// ```
#[derive(Default)]
pub struct TurretPluginGroup;

impl PluginGroup for TurretPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(TurretCorePlugin)
            .add(TurretInputPlugin)
            .add(TurretVfxPlugin)
            .add(TurretDebugPlugin)
    }
}

/// System set containing the whole turret game step.
///
/// Order your own input writers `.before(TurretSystems)` and anything reading
/// hits or scores `.after(TurretSystems)`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurretSystems;

/// Core turret plugin: aiming, slot rotation, firing, hits and scoring.
///
/// Runs headless; it needs only `MinimalPlugins` and `TransformPlugin`.
///
/// # Systems
/// One chained step per frame, in this order:
/// - expire pooled projectiles and effects, advance projectiles without physics
/// - advance mount rotations, weapon fades and shot cooldowns
/// - set up new turrets
/// - apply aim, rotate and fire inputs
/// - sync pooled bodies and forward collisions (with physics only)
/// - resolve contacts into hits, accumulate score, animate the score readout
pub struct TurretCorePlugin;

impl Plugin for TurretCorePlugin {
    fn build(&self, app: &mut App) {
        let capacity = match app.world().get_resource::<config::TurretConfig>() {
            Some(config) => {
                if let Err(err) = config.validate() {
                    warn!("{err}; out-of-range durations fall back to their defaults");
                }
                config.pool_capacity
            }
            None => config::TurretConfig::default().pool_capacity,
        };

        app.register_type::<components::Turret>()
            .register_type::<components::SlotBindings>()
            .register_type::<components::WeaponFade>()
            .register_type::<components::Projectile>()
            .register_type::<components::Target>()
            .register_type::<components::HitTag>()
            .register_type::<components::Pooled>()
            .register_type::<components::ImpactEffect>()
            .register_type::<systems::score::ScoreDisplay>()
            .register_type::<config::TurretConfig>()
            .register_type::<resources::Scoreboard>()
            .init_resource::<config::TurretConfig>()
            .init_resource::<resources::Scoreboard>()
            .insert_resource(resources::ObjectPool::new(capacity))
            .add_message::<events::AimInput>()
            .add_message::<events::RotateInput>()
            .add_message::<events::FireInput>()
            .add_message::<events::ShotFired>()
            .add_message::<events::RotationFinished>()
            .add_message::<events::ContactEvent>()
            .add_message::<events::HitEvent>()
            .add_message::<events::ScoreChanged>()
            .add_systems(Startup, config::load_turret_config)
            .add_systems(
                Update,
                (
                    (
                        systems::pool::expire_projectiles,
                        systems::pool::expire_impact_effects,
                        systems::pool::advance_projectiles
                            .run_if(not(systems::physics::physics_active)),
                    )
                        .chain(),
                    (
                        systems::rotation::animate_rotations,
                        systems::rotation::animate_weapon_fades,
                        systems::fire::tick_fire_cooldowns,
                        systems::rotation::initialize_turrets,
                    )
                        .chain(),
                    (
                        systems::aim::apply_aim_input,
                        systems::rotation::handle_rotate_input,
                        systems::fire::handle_fire_input,
                    )
                        .chain(),
                    (
                        systems::hit::resolve_contacts,
                        systems::score::accumulate_score,
                        systems::score::animate_score_display,
                    )
                        .chain(),
                )
                    .chain()
                    .in_set(TurretSystems),
            );

        // 3D Physics Systems
        #[cfg(feature = "dim3")]
        {
            use avian3d::prelude::SpatialQueryPipeline;
            app.add_systems(
                Update,
                (
                    systems::physics::sync_pooled_bodies,
                    systems::physics::forward_collision_starts,
                )
                    .chain()
                    .after(systems::fire::handle_fire_input)
                    .before(systems::hit::resolve_contacts)
                    .in_set(TurretSystems)
                    .run_if(resource_exists::<SpatialQueryPipeline>),
            );
        }
    }
}

/// Mouse and keyboard bindings plus cursor capture.
///
/// # Systems
/// - `read_aim_input` / `read_rotate_input` / `read_fire_input` - device state to turret messages
/// - `lock_cursor` - capture the cursor at startup
/// - `grab_cursor` - re-capture on click, release on Escape
pub struct TurretInputPlugin;

impl Plugin for TurretInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, systems::input::lock_cursor)
            .add_systems(
                Update,
                (
                    systems::input::read_aim_input,
                    systems::input::read_rotate_input,
                    systems::input::read_fire_input,
                    systems::input::grab_cursor,
                )
                    .before(TurretSystems),
            );
    }
}

/// VFX plugin (prefab meshes, weapon fades, score text).
///
/// # Systems
/// - `attach_pooled_visuals` - meshes and materials for new pool entities
/// - `sync_weapon_fades` - weapon opacity into material alpha
/// - `sync_score_text` - animated score into UI text
pub struct TurretVfxPlugin;

impl Plugin for TurretVfxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<systems::vfx::TurretAssets>().add_systems(
            Update,
            (
                systems::vfx::attach_pooled_visuals,
                systems::vfx::sync_weapon_fades,
                systems::vfx::sync_score_text,
            )
                .after(TurretSystems),
        );
    }
}

/// Debug plugin for turret visualization, enabled with `TurretConfig::debug_draw`.
pub struct TurretDebugPlugin;

impl Plugin for TurretDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::debug::draw_turret_debug);
    }
}
