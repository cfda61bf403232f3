//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system in tests without building a full schedule.
//!
//! Systems that use `Commands` enqueue structural changes. We call `world.flush()` after
//! running so queued commands are applied before assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Insert a generic `Time` clock parked at `elapsed`.
///
/// Gameplay systems read `Res<Time>`; inside `FixedUpdate` that is the fixed clock,
/// in a bare `World` it is whatever we put here.
pub fn time_at(world: &mut World, elapsed: Duration) {
    let mut time = Time::<()>::default();
    time.advance_to(elapsed);
    world.insert_resource(time);
}

/// Move the test clock forward by `delta`.
pub fn advance_time(world: &mut World, delta: Duration) {
    world.resource_mut::<Time>().advance_by(delta);
}

pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
