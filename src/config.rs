//! Runtime turret configuration, optionally loaded from `assets/turret.toml`.
//!
//! [`TurretConfig`] is a Bevy [`Resource`] holding every tunable the turret
//! systems read. The plugin inserts the compiled defaults; the
//! [`load_turret_config`] startup system then overwrites them with any values
//! found in the TOML file. Missing keys keep their defaults, so a file can
//! override just the values you care about:
//!
//! ```toml
//! rotation_time = 0.35
//! min_bounds = [-6.0, -2.0]
//! max_bounds = [6.0, 4.0]
//! ```

use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::{TurretError, TurretResult};
use crate::resources::ObjectPool;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "assets/turret.toml";

/// Runtime-tunable turret configuration.
///
/// # Fields
/// * `mouse_velocity` - Scale applied to raw pointer deltas
/// * `min_bounds` / `max_bounds` - Aim clamp rectangle for the turret body
/// * `rotation_time` - Seconds the mount takes to turn to the next slot (rotation lock)
/// * `shoot_time` - Cooldown between shots in seconds (fire lock)
/// * `shoot_force` - Impulse magnitude given to each projectile
/// * `projectile_lifetime` - Seconds before an unspent projectile returns to the pool
/// * `effect_lifetime` - Seconds a cosmetic hit effect stays alive
/// * `pool_capacity` - Maximum idle entities kept per prefab
/// * `debug_draw` - Draw aim bounds and projectile paths with gizmos
#[derive(Resource, Reflect, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct TurretConfig {
    pub mouse_velocity: f32,
    pub min_bounds: Vec2,
    pub max_bounds: Vec2,
    pub rotation_time: f32,
    pub shoot_time: f32,
    pub shoot_force: f32,
    pub projectile_lifetime: f32,
    pub effect_lifetime: f32,
    pub pool_capacity: usize,
    pub debug_draw: bool,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            mouse_velocity: 0.01,
            min_bounds: Vec2::new(-4.0, -2.0),
            max_bounds: Vec2::new(4.0, 3.0),
            rotation_time: 0.5,
            shoot_time: 0.25,
            shoot_force: 12.0,
            projectile_lifetime: 4.0,
            effect_lifetime: 1.0,
            pool_capacity: 32,
            debug_draw: false,
        }
    }
}

/// On-disk shape of the configuration; every key is optional.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TurretConfigFile {
    mouse_velocity: Option<f32>,
    min_bounds: Option<[f32; 2]>,
    max_bounds: Option<[f32; 2]>,
    rotation_time: Option<f32>,
    shoot_time: Option<f32>,
    shoot_force: Option<f32>,
    projectile_lifetime: Option<f32>,
    effect_lifetime: Option<f32>,
    pool_capacity: Option<usize>,
    debug_draw: Option<bool>,
}

impl TurretConfig {
    /// Parses TOML text on top of the compiled defaults and validates the result.
    pub fn from_toml_str(contents: &str) -> TurretResult<Self> {
        let file: TurretConfigFile = toml::from_str(contents)?;
        let defaults = Self::default();
        let config = Self {
            mouse_velocity: file.mouse_velocity.unwrap_or(defaults.mouse_velocity),
            min_bounds: file.min_bounds.map(Vec2::from_array).unwrap_or(defaults.min_bounds),
            max_bounds: file.max_bounds.map(Vec2::from_array).unwrap_or(defaults.max_bounds),
            rotation_time: file.rotation_time.unwrap_or(defaults.rotation_time),
            shoot_time: file.shoot_time.unwrap_or(defaults.shoot_time),
            shoot_force: file.shoot_force.unwrap_or(defaults.shoot_force),
            projectile_lifetime: file.projectile_lifetime.unwrap_or(defaults.projectile_lifetime),
            effect_lifetime: file.effect_lifetime.unwrap_or(defaults.effect_lifetime),
            pool_capacity: file.pool_capacity.unwrap_or(defaults.pool_capacity),
            debug_draw: file.debug_draw.unwrap_or(defaults.debug_draw),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load_from_path(path: impl AsRef<Path>) -> TurretResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| TurretError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that every value is inside the range the systems rely on.
    pub fn validate(&self) -> TurretResult<()> {
        if !self.mouse_velocity.is_finite() {
            return Err(TurretError::InvalidConfig {
                field: "mouse_velocity",
                reason: "must be finite",
            });
        }
        if !(self.min_bounds.cmple(self.max_bounds).all()) {
            return Err(TurretError::InvalidConfig {
                field: "min_bounds",
                reason: "must be <= max_bounds on both axes",
            });
        }
        let durations = [
            ("rotation_time", self.rotation_time),
            ("shoot_time", self.shoot_time),
            ("projectile_lifetime", self.projectile_lifetime),
            ("effect_lifetime", self.effect_lifetime),
        ];
        for (field, value) in durations {
            if Duration::try_from_secs_f32(value).is_err() {
                return Err(TurretError::InvalidConfig {
                    field,
                    reason: "must be a number of seconds >= 0 that fits a Duration",
                });
            }
        }
        if !(self.shoot_force.is_finite() && self.shoot_force >= 0.0) {
            return Err(TurretError::InvalidConfig {
                field: "shoot_force",
                reason: "must be finite and >= 0",
            });
        }
        Ok(())
    }

    /// How long the mount takes to turn to the next slot.
    pub fn rotation_duration(&self) -> Duration {
        seconds("rotation_time", self.rotation_time, Self::default().rotation_time)
    }

    /// Cooldown between shots.
    pub fn shoot_duration(&self) -> Duration {
        seconds("shoot_time", self.shoot_time, Self::default().shoot_time)
    }

    /// Time before an unspent projectile returns to the pool.
    pub fn projectile_duration(&self) -> Duration {
        seconds(
            "projectile_lifetime",
            self.projectile_lifetime,
            Self::default().projectile_lifetime,
        )
    }

    /// Time a hit effect stays alive.
    pub fn effect_duration(&self) -> Duration {
        seconds("effect_lifetime", self.effect_lifetime, Self::default().effect_lifetime)
    }
}

/// Converts a configured number of seconds, falling back to the compiled default.
///
/// A resource inserted directly skips [`TurretConfig::validate`], so a negative,
/// NaN or oversized value can still reach the systems here.
fn seconds(field: &str, value: f32, default: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_else(|err| {
        warn!("turret config {field} = {value}: {err}; using {default}s");
        Duration::from_secs_f32(default)
    })
}

/// Startup system: overwrite [`TurretConfig`] with `assets/turret.toml` when present.
///
/// A missing file keeps the defaults. A malformed or out-of-range file is
/// reported and ignored so the game still starts. The pool capacity is
/// applied to the [`ObjectPool`] as well.
pub fn load_turret_config(mut config: ResMut<TurretConfig>, pool: Option<ResMut<ObjectPool>>) {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        debug!("no {DEFAULT_CONFIG_PATH} found; using compiled turret defaults");
        return;
    }
    match TurretConfig::load_from_path(path) {
        Ok(loaded) => {
            *config = loaded;
            if let Some(mut pool) = pool {
                pool.max_size = config.pool_capacity;
            }
            info!("loaded turret config from {DEFAULT_CONFIG_PATH}");
        }
        Err(err) => warn!("{err}; using compiled turret defaults"),
    }
}
