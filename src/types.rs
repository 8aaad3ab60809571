//! Weapon ring: the fixed cyclic set of weapon slots on the turret mount.

use bevy::prelude::*;

/// Angular tolerance (degrees) when matching a mount yaw against a slot angle.
pub const ORIENTATION_TOLERANCE_DEGREES: f32 = 1e-3;

/// Direction of a mount rotation request.
///
/// # Example
/// ```
/// use rotary_turret::types::RotateDirection;
///
/// assert_eq!(RotateDirection::Left.opposite(), RotateDirection::Right);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum RotateDirection {
    /// Rotate the mount to the left-hand neighbour
    Left,
    /// Rotate the mount to the right-hand neighbour
    Right,
}

impl RotateDirection {
    /// Returns the inverse direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One of the three weapon slots mounted around the turret.
///
/// The slots form a fixed cycle: stepping three times in the same direction
/// returns to the starting slot, and a left step is undone by a right step.
/// Each slot faces the player at a fixed mount yaw (see
/// [`WeaponSlot::orientation_degrees`]).
///
/// # Variants
/// * `Pinky` - Slot facing the player at 270°
/// * `Fucsia` - Slot facing the player at 0° (the default slot)
/// * `Giallo` - Slot facing the player at 90°
///
/// # Example
/// ```
/// use rotary_turret::types::{RotateDirection, WeaponSlot};
///
/// let slot = WeaponSlot::Fucsia.next(RotateDirection::Right);
/// assert_eq!(slot, WeaponSlot::Pinky);
/// assert_eq!(slot.next(RotateDirection::Left), WeaponSlot::Fucsia);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Reflect)]
pub enum WeaponSlot {
    /// Slot at 270°
    Pinky,
    /// Slot at 0°
    #[default]
    Fucsia,
    /// Slot at 90°
    Giallo,
}

impl WeaponSlot {
    /// Every slot, in table order.
    pub const ALL: [WeaponSlot; 3] = [WeaponSlot::Pinky, WeaponSlot::Fucsia, WeaponSlot::Giallo];

    /// Slot used whenever the configuration does not name one.
    ///
    /// An unknown mount orientation and a missing slot binding both snap here,
    /// so the ring and fire control always agree on the fallback.
    pub const DEFAULT: WeaponSlot = WeaponSlot::Fucsia;

    /// Position of the slot in [`WeaponSlot::ALL`], used to index per-slot tables.
    pub fn index(self) -> usize {
        match self {
            Self::Pinky => 0,
            Self::Fucsia => 1,
            Self::Giallo => 2,
        }
    }

    /// Returns the neighbouring slot in the given direction.
    ///
    /// # Arguments
    /// * `direction` - Which way the mount turns
    ///
    /// # Returns
    /// The slot that faces the player once the rotation completes
    pub fn next(self, direction: RotateDirection) -> Self {
        match (direction, self) {
            (RotateDirection::Left, Self::Giallo) => Self::Pinky,
            (RotateDirection::Left, Self::Fucsia) => Self::Giallo,
            (RotateDirection::Left, Self::Pinky) => Self::Fucsia,
            (RotateDirection::Right, Self::Giallo) => Self::Fucsia,
            (RotateDirection::Right, Self::Fucsia) => Self::Pinky,
            (RotateDirection::Right, Self::Pinky) => Self::Giallo,
        }
    }

    /// Mount yaw (degrees) at which this slot faces the player.
    pub fn orientation_degrees(self) -> f32 {
        match self {
            Self::Pinky => 270.0,
            Self::Fucsia => 0.0,
            Self::Giallo => 90.0,
        }
    }

    /// Mount yaw in radians, for building rotations.
    pub fn yaw_radians(self) -> f32 {
        self.orientation_degrees().to_radians()
    }

    /// Maps a mount yaw to the slot facing the player.
    ///
    /// The angle is normalized into `[0, 360)` before matching. Angles that do
    /// not land on a slot angle snap to [`WeaponSlot::DEFAULT`].
    ///
    /// # Arguments
    /// * `degrees` - Mount yaw in degrees
    ///
    /// # Returns
    /// The matching slot, or the default slot for any other angle
    pub fn from_orientation(degrees: f32) -> Self {
        let normalized = normalize_degrees(degrees);
        Self::ALL
            .into_iter()
            .find(|slot| angle_matches(normalized, slot.orientation_degrees()))
            .unwrap_or_else(|| {
                debug!(
                    "mount yaw {:.3}° matches no weapon slot; snapping to {:?}",
                    degrees,
                    Self::DEFAULT
                );
                Self::DEFAULT
            })
    }

    /// Maps a mount rotation to the slot facing the player, using its yaw.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::from_orientation(yaw_degrees(rotation))
    }
}

/// Yaw component (rotation about +Y) of a rotation, in degrees.
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw.to_degrees()
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn angle_matches(normalized: f32, slot_degrees: f32) -> bool {
    let diff = (normalized - slot_degrees).abs();
    diff <= ORIENTATION_TOLERANCE_DEGREES || (360.0 - diff) <= ORIENTATION_TOLERANCE_DEGREES
}
