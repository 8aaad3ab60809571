//! Aim controller - pointer deltas move the turret body inside a clamp rectangle.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::components::Turret;
use crate::config::TurretConfig;
use crate::events::AimInput;

/// One aim update.
///
/// Scales the raw delta by `sensitivity`, inverts the horizontal axis, adds it
/// to `position` and clamps each axis independently into `[min, max]`.
///
/// # Arguments
/// * `position` - Current aim position
/// * `raw_delta` - Pointer motion since the last update (y up)
/// * `sensitivity` - The configured `mouse_velocity`
/// * `min` / `max` - Clamp rectangle
///
/// # Returns
/// The new aim position
pub fn aim_step(position: Vec2, raw_delta: Vec2, sensitivity: f32, min: Vec2, max: Vec2) -> Vec2 {
    let scaled = raw_delta * sensitivity;
    let moved = position + Vec2::new(-scaled.x, scaled.y);
    moved.clamp(min, max)
}

/// Apply aim input to every turret and move the turret bodies.
pub fn apply_aim_input(
    config: Res<TurretConfig>,
    mut aim_inputs: MessageReader<AimInput>,
    mut turrets: Query<(&mut Turret, &mut Transform)>,
) {
    // each input clamps on its own, as if delivered in separate frames
    let deltas: Vec<Vec2> = aim_inputs.read().map(|input| input.delta).collect();
    if deltas.is_empty() {
        return;
    }

    for (mut turret, mut transform) in turrets.iter_mut() {
        turret.aim_position = deltas.iter().fold(turret.aim_position, |position, delta| {
            aim_step(
                position,
                *delta,
                config.mouse_velocity,
                config.min_bounds,
                config.max_bounds,
            )
        });
        transform.translation.x = turret.aim_position.x;
        transform.translation.y = turret.aim_position.y;
    }
}
