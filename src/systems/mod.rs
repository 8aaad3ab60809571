//! Systems module - all ECS systems for the turret game loop.

pub mod aim;
pub mod debug;
pub mod fire;
pub mod hit;
pub mod input;
pub mod physics;
pub mod pool;
pub mod rotation;
pub mod score;
pub mod vfx;
