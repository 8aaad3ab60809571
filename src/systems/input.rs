//! Device bindings - translate mouse and keyboard state into turret inputs.
//!
//! | Input               | Message                |
//! |---------------------|------------------------|
//! | mouse motion        | [`AimInput`]           |
//! | `Q`                 | [`RotateInput::left`]  |
//! | `E`                 | [`RotateInput::right`] |
//! | left mouse, `Space` | [`FireInput`]          |
//!
//! The cursor is captured at startup and on click, and released with `Escape`.

use bevy::ecs::message::MessageWriter;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::events::{AimInput, FireInput, RotateInput};

/// Forward mouse motion as aim deltas with y pointing up.
pub fn read_aim_input(motion: Res<AccumulatedMouseMotion>, mut aims: MessageWriter<AimInput>) {
    let delta = motion.delta;
    if delta != Vec2::ZERO {
        aims.write(AimInput::new(Vec2::new(delta.x, -delta.y)));
    }
}

/// Q / E turn the weapon mount.
pub fn read_rotate_input(keyboard: Res<ButtonInput<KeyCode>>, mut rotations: MessageWriter<RotateInput>) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        rotations.write(RotateInput::left());
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        rotations.write(RotateInput::right());
    }
}

/// Left click or Space fires.
pub fn read_fire_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut shots: MessageWriter<FireInput>,
) {
    if mouse.just_pressed(MouseButton::Left) || keyboard.just_pressed(KeyCode::Space) {
        shots.write(FireInput);
    }
}

/// Hide and lock the cursor, or give it back.
pub fn set_cursor_captured(cursor_options: &mut CursorOptions, captured: bool) {
    cursor_options.visible = !captured;
    cursor_options.grab_mode = if captured {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
}

/// Capture the cursor as soon as the window exists.
pub fn lock_cursor(mut cursor_options: Single<&mut CursorOptions, With<PrimaryWindow>>) {
    set_cursor_captured(&mut cursor_options, true);
}

/// Re-capture on click, release on Escape.
pub fn grab_cursor(
    mut cursor_options: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        set_cursor_captured(&mut cursor_options, false);
    } else if mouse.just_pressed(MouseButton::Left) {
        set_cursor_captured(&mut cursor_options, true);
    }
}
