//! Physics plugin: avian3d and the kinematic controller that drives the player.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::plugins::kinematic;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(Vec3::NEG_Y * 9.81));
    kinematic::plugin(app);
}
