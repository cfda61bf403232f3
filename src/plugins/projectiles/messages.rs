//! Buffered projectile traffic.
//!
//! Producers (the weapon) only enqueue intent; the projectile systems are the
//! single writer of dart entities. Deaths go out the same way so drops, the
//! movement lock and the HUD can react without reaching into this module.

use bevy::prelude::*;

use crate::plugins::enemies::EnemyKind;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SpawnDart {
    pub origin: Vec3,
    /// Displacement per tick.
    pub velocity: Vec3,
}

/// Sent once per enemy, on the hit that took its last health point.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct EnemyDefeated {
    pub enemy: Entity,
    pub kind: EnemyKind,
    pub position: Vec3,
}
