//! World plugin: the arena floor, its boundary walls and a few ramps.
//!
//! Spawned once at startup and kept across restarts. Blocks carry their size in
//! `ArenaBlock` so the visuals plugin can give them meshes in the full app.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

/// Half the side of the square arena.
pub const ARENA_HALF: f32 = 100.0;
const WALL_HEIGHT: f32 = 6.0;
const WALL_THICKNESS: f32 = 2.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBlock {
    pub size: Vec3,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_arena);
}

fn spawn_arena(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::World, [Layer::Player]);

    let mut spawn_block = |name: &str, tf: Transform, size: Vec3| {
        commands.spawn((
            Name::new(name.to_owned()),
            ArenaBlock { size },
            tf,
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            layers,
        ));
    };

    let side = ARENA_HALF * 2.0 + WALL_THICKNESS * 2.0;
    spawn_block(
        "Ground",
        Transform::from_xyz(0.0, -0.5, 0.0),
        Vec3::new(side, 1.0, side),
    );

    let offset = ARENA_HALF + WALL_THICKNESS * 0.5;
    let y = WALL_HEIGHT * 0.5;
    let x_wall = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, side);
    let z_wall = Vec3::new(side, WALL_HEIGHT, WALL_THICKNESS);
    spawn_block("WallNorth", Transform::from_xyz(0.0, y, -offset), z_wall);
    spawn_block("WallSouth", Transform::from_xyz(0.0, y, offset), z_wall);
    spawn_block("WallWest", Transform::from_xyz(-offset, y, 0.0), x_wall);
    spawn_block("WallEast", Transform::from_xyz(offset, y, 0.0), x_wall);

    // Gentle ramps: walkable, so the controller follows their slope.
    for (i, (x, z, yaw)) in [(40.0, 40.0, 0.0), (-45.0, -35.0, 1.2), (-30.0, 50.0, 2.4)]
        .into_iter()
        .enumerate()
    {
        let tf = Transform::from_xyz(x, 0.0, z).with_rotation(
            Quat::from_rotation_y(yaw) * Quat::from_rotation_x(0.25),
        );
        spawn_block(&format!("Ramp{i}"), tf, Vec3::new(8.0, 1.0, 14.0));
    }
}
