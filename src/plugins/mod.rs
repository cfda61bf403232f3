//! Feature plugins.

use bevy::prelude::*;

pub mod audio;
pub mod core;
pub mod enemies;
pub mod hud;
pub mod kinematic;
pub mod physics;
pub mod player;
pub mod progression;
pub mod projectiles;
pub mod session;
pub mod shield;
pub mod vitals;
pub mod weapon;
pub mod world;
pub mod zones;

// Render-only
pub mod camera;
pub mod lighting;
pub mod visuals;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: it inserts `Tunables`, which the others read at build time.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    session::plugin(app);
    audio::plugin(app);
    player::plugin(app);
    zones::plugin(app);
    shield::plugin(app);
    vitals::plugin(app);
    weapon::plugin(app);
    projectiles::plugin(app);
    enemies::plugin(app);
    progression::plugin(app);
    hud::plugin(app);
}

/// Register avian physics, the kinematic controller and the arena colliders.
pub fn register_physics(app: &mut App) {
    physics::plugin(app);
    world::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    visuals::plugin(app);
    hud::render_plugin(app);
    audio::playback_plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_physics(app);
    register_render(app);
}
