//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime and time.
//! - we then call `dragon_arena::game::configure_headless` to install gameplay plugins.
//! - time advances by exactly one fixed step per `app.update()` unless asked otherwise.
#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use dragon_arena::common::tunables::Tunables;
use dragon_arena::plugins::player::{ControlInput, Player};

pub const TICK_HZ: f64 = 60.0;

/// Tunables with no zones, so nothing hides or hurts the player by chance.
pub fn quiet_tunables() -> Tunables {
    let mut t = Tunables::default();
    t.tick_hz = TICK_HZ;
    t.zones.bushes.count = 0;
    t.zones.water.count = 0;
    t.zones.hazards.count = 0;
    t
}

pub fn app_headless() -> App {
    app_with(quiet_tunables())
}

pub fn app_with(tunables: Tunables) -> App {
    app_with_steps(tunables, 1)
}

/// Like `app_with`, but each `app.update()` runs `steps` fixed ticks.
pub fn app_with_steps(tunables: Tunables, steps: u32) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        f64::from(steps) / tunables.tick_hz,
    )));
    app.insert_resource(tunables);

    dragon_arena::game::configure_headless(&mut app);

    // First update enters InGame and spawns the session.
    app.update();
    app
}

pub fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Update until `done` holds, at most `max` times. Returns whether it held.
pub fn run_until(app: &mut App, max: usize, mut done: impl FnMut(&mut App) -> bool) -> bool {
    for _ in 0..max {
        if done(app) {
            return true;
        }
        app.update();
    }
    done(app)
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .expect("one player")
}

pub fn place_player(app: &mut App, at: Vec3) {
    let e = player(app);
    app.world_mut().get_mut::<Transform>(e).expect("player transform").translation = at;
}

pub fn controls(app: &mut App) -> Mut<'_, ControlInput> {
    app.world_mut().resource_mut::<ControlInput>()
}
