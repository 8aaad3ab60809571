use bevy::prelude::*;

use crate::components::{Projectile, Turret};
use crate::config::TurretConfig;

/// Draw debug gizmos for the aim area and projectiles.
///
/// Draws the aim clamp rectangle, each turret's aim point, and velocity
/// vectors of projectiles in flight.
pub fn draw_turret_debug(
    mut gizmos: Gizmos,
    config: Res<TurretConfig>,
    turrets: Query<&Turret>,
    projectiles: Query<(&GlobalTransform, &Projectile)>,
) {
    if !config.debug_draw {
        return;
    }

    let center = (config.min_bounds + config.max_bounds) * 0.5;
    let size = config.max_bounds - config.min_bounds;
    gizmos.rect(
        Isometry3d::from_translation(center.extend(0.0)),
        size,
        Color::srgb(0.2, 0.6, 1.0),
    );

    for turret in turrets.iter() {
        gizmos.sphere(turret.aim_position.extend(0.0), 0.1, Color::srgb(1.0, 1.0, 0.0));
    }

    for (transform, projectile) in projectiles.iter() {
        let position = transform.translation();
        gizmos.sphere(position, 0.05, Color::srgb(1.0, 0.0, 0.0));
        // scaled down for visibility
        let end = position + projectile.velocity * 0.1;
        gizmos.line(position, end, Color::srgb(0.0, 1.0, 0.0));
    }
}
