use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{advance_time, ms, run_system_once, time_at};

fn tuning() -> ShieldTuning {
    ShieldTuning::default()
}

#[test]
fn expires_after_duration_then_cools_down() {
    let mut shield = Shield::default();
    assert_eq!(shield.press(ms(0), false, &tuning()), ShieldOutcome::Raised);

    assert!(!shield.tick(ms(4999), &tuning()));
    assert!(shield.is_blocking());
    assert!(shield.tick(ms(5000), &tuning()));
    assert!(!shield.is_blocking());

    assert_eq!(shield.press(ms(5999), false, &tuning()), ShieldOutcome::CoolingDown);
    assert_eq!(shield.press(ms(6000), false, &tuning()), ShieldOutcome::Raised);
}

#[test]
fn release_cancels_auto_expiry() {
    let mut shield = Shield::default();
    shield.press(ms(0), false, &tuning());
    assert!(shield.release(ms(1000), &tuning()));
    assert!(!shield.release(ms(1100), &tuning()));

    shield.press(ms(2000), false, &tuning());
    // The first activation's expiry (5000 ms) must not lower the second one.
    assert!(!shield.tick(ms(5000), &tuning()));
    assert!(shield.is_blocking());
    assert!(shield.tick(ms(7000), &tuning()));
}

#[test]
fn hazard_and_double_press_are_rejected() {
    let mut shield = Shield::default();
    assert_eq!(shield.press(ms(0), true, &tuning()), ShieldOutcome::InHazard);
    assert!(!shield.is_blocking());

    shield.press(ms(0), false, &tuning());
    assert_eq!(shield.press(ms(10), false, &tuning()), ShieldOutcome::AlreadyRaised);
}

fn world() -> World {
    let mut world = World::new();
    time_at(&mut world, ms(1000));
    world.insert_resource(Tunables::default());
    world.init_resource::<ZoneOccupancy>();
    world.init_resource::<Shield>();
    world.init_resource::<Messages<SoundCue>>();
    world
}

#[test]
fn press_raises_and_drops_the_trigger() {
    let mut world = world();
    world.insert_resource(ControlInput {
        fire_held: true,
        fire_pressed: true,
        block_pressed: true,
        ..default()
    });

    run_system_once(&mut world, super::controls);

    assert!(world.resource::<Shield>().is_blocking());
    let input = world.resource::<ControlInput>();
    assert!(!input.fire_held && !input.fire_pressed && !input.block_pressed);
    let cues: Vec<_> = world.resource_mut::<Messages<SoundCue>>().drain().collect();
    assert_eq!(cues, vec![SoundCue::Play(Sound::ShieldHold)]);
}

#[test]
fn expiry_system_stops_the_hold_sound() {
    let mut world = world();
    world.insert_resource(ControlInput { block_pressed: true, ..default() });
    run_system_once(&mut world, super::controls);
    world.resource_mut::<Messages<SoundCue>>().clear();

    advance_time(&mut world, ms(5000));
    run_system_once(&mut world, super::expire);

    assert!(!world.resource::<Shield>().is_blocking());
    let cues: Vec<_> = world.resource_mut::<Messages<SoundCue>>().drain().collect();
    assert_eq!(cues, vec![SoundCue::Stop(Sound::ShieldHold)]);
}
