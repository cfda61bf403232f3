//! Collision layers.
//!
//! Only the arena and the player collide. Enemies, darts and pickups are
//! resolved with plain distance tests.

use avian3d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
}
