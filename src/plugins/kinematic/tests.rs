use std::time::Duration;

use bevy::prelude::*;

use super::*;

struct NoProbe;

impl GroundProbe for NoProbe {
    fn ground_normal(&self, _: Vec3, _: Entity, _: f32) -> Option<Vec3> {
        None
    }
}

struct FixedProbe(Vec3);

impl GroundProbe for FixedProbe {
    fn ground_normal(&self, _: Vec3, _: Entity, _: f32) -> Option<Vec3> {
        Some(self.0)
    }
}

fn entities() -> (Entity, Entity, Entity) {
    let mut world = World::new();
    (
        world.spawn_empty().id(),
        world.spawn_empty().id(),
        world.spawn_empty().id(),
    )
}

fn body(velocity: Vec3) -> KinematicBody {
    KinematicBody { velocity, ..KinematicBody::new(&KinematicTuning::default()) }
}

fn contact(body1: Entity, body2: Entity, normal: Vec3, y: f32) -> ContactSample {
    ContactSample { body1, body2, normal, point: Vec3::new(0.0, y, 0.0), enabled: true }
}

fn step<'a>(entity: Entity, contacts: &'a [ContactSample]) -> Step<'a> {
    Step {
        entity,
        origin: Vec3::new(0.0, 1.3, 0.0),
        contacts,
        gravity: Vec3::new(0.0, -9.81, 0.0),
        dt: Duration::from_millis(16),
    }
}

#[test]
fn airborne_body_accumulates_gravity() {
    let (player, ..) = entities();
    let tuning = KinematicTuning::default();

    let v = resolve_step(&body(Vec3::X), &step(player, &[]), &tuning, &NoProbe);

    let expected_y = -9.81 * 16.0 * tuning.gravity_per_ms;
    assert!((v.y - expected_y).abs() < 1e-3, "{v:?}");
    assert_eq!(v.x, 1.0);
}

#[test]
fn flat_ground_removes_vertical_component() {
    let (player, floor, _) = entities();
    // Player is body2: the floor's normal already faces it.
    let contacts = [contact(floor, player, Vec3::Y, 0.0)];

    let v = resolve_step(
        &body(Vec3::new(2.0, -3.0, 1.0)),
        &step(player, &contacts),
        &KinematicTuning::default(),
        &NoProbe,
    );

    assert!(v.abs_diff_eq(Vec3::new(2.0, 0.0, 1.0), 1e-6), "{v:?}");
}

#[test]
fn wall_contact_slides_along_the_wall() {
    let (player, floor, wall) = entities();
    // Player is body1 against the wall, so the stored normal points into the wall.
    let contacts = [
        contact(player, wall, Vec3::X, 1.0),
        contact(floor, player, Vec3::Y, 0.0),
    ];

    let v = resolve_step(
        &body(Vec3::new(3.0, 0.0, 2.0)),
        &step(player, &contacts),
        &KinematicTuning::default(),
        &NoProbe,
    );

    assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-6), "{v:?}");
}

#[test]
fn moving_away_from_a_wall_is_untouched() {
    let (player, floor, wall) = entities();
    let contacts = [
        contact(player, wall, Vec3::X, 1.0),
        contact(floor, player, Vec3::Y, 0.0),
    ];

    let v = resolve_step(
        &body(Vec3::new(-3.0, 0.0, 0.0)),
        &step(player, &contacts),
        &KinematicTuning::default(),
        &NoProbe,
    );

    assert_eq!(v, Vec3::new(-3.0, 0.0, 0.0));
}

#[test]
fn disabled_contacts_are_ignored() {
    let (player, floor, _) = entities();
    let mut c = contact(floor, player, Vec3::Y, 0.0);
    c.enabled = false;
    let tuning = KinematicTuning::default();

    let v = resolve_step(&body(Vec3::ZERO), &step(player, &[c]), &tuning, &NoProbe);

    assert!(v.y < 0.0, "no ground means gravity applies");
}

#[test]
fn highest_ground_contact_wins() {
    let (player, low, high) = entities();
    let tilted = Vec3::new(0.6, 0.8, 0.0);
    let contacts = [
        contact(low, player, Vec3::Y, 0.1),
        contact(high, player, tilted, 2.0),
    ];
    let v0 = Vec3::new(1.0, 0.0, 0.0);

    let v = resolve_step(&body(v0), &step(player, &contacts), &KinematicTuning::default(), &NoProbe);

    // Projected onto the tilted plane, not the flat one.
    assert!(v.dot(tilted).abs() < 1e-6);
    assert!(v.y.abs() > 1e-3);
}

#[test]
fn slopes_disabled_uses_world_up() {
    let (player, ramp, _) = entities();
    let tilted = Vec3::new(0.6, 0.8, 0.0);
    let contacts = [contact(ramp, player, tilted, 0.5)];
    let mut b = body(Vec3::new(1.0, -1.0, 0.0));
    b.enable_slopes = false;

    let v = resolve_step(&b, &step(player, &contacts), &KinematicTuning::default(), &NoProbe);

    assert_eq!(v, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn probe_refines_slope_normal_only_when_flatter() {
    let (player, ramp, _) = entities();
    let contact_n = Vec3::new(0.6, 0.8, 0.0);
    let contacts = [contact(ramp, player, contact_n, 0.5)];
    let v0 = Vec3::new(1.0, 0.0, 0.0);
    let tuning = KinematicTuning::default();

    let flatter = Vec3::new(0.0, 1.0, 0.0);
    let v = resolve_step(&body(v0), &step(player, &contacts), &tuning, &FixedProbe(flatter));
    assert_eq!(v, v0);

    let steeper = Vec3::new(0.8, 0.6, 0.0);
    let v = resolve_step(&body(v0), &step(player, &contacts), &tuning, &FixedProbe(steeper));
    assert!(v.dot(contact_n).abs() < 1e-6);
}

#[test]
fn rising_jump_keeps_falling_under_gravity() {
    let (player, floor, _) = entities();
    let contacts = [contact(floor, player, Vec3::Y, 0.0)];
    let mut b = body(Vec3::new(0.0, 10.0, 0.0));
    b.enable_jumps = true;

    let v = resolve_step(&b, &step(player, &contacts), &KinematicTuning::default(), &NoProbe);

    assert!(v.y < 10.0 && v.y > 0.0, "{v:?}");
}

#[test]
fn contacts_of_other_bodies_are_skipped() {
    let (player, a, b) = entities();
    let contacts = [contact(a, b, Vec3::Y, 0.0)];

    let v = resolve_step(&body(Vec3::ZERO), &step(player, &contacts), &KinematicTuning::default(), &NoProbe);

    assert!(v.y < 0.0);
}

#[test]
fn square_corner_stops_planar_motion_into_both_walls() {
    let (player, east, north) = entities();
    let contacts = [
        contact(east, player, Vec3::NEG_X, 1.0),
        contact(north, player, Vec3::NEG_Z, 1.0),
    ];

    let v = resolve_step(
        &body(Vec3::new(1.0, 0.0, 1.0)),
        &step(player, &contacts),
        &KinematicTuning::default(),
        &NoProbe,
    );

    assert!(v.x.abs() < 1e-6 && v.z.abs() < 1e-6, "{v:?}");
}

#[test]
fn corner_wall_the_intent_only_grazes_does_not_block_the_slide() {
    let (player, slanted, side) = entities();
    let contacts = [
        contact(slanted, player, Vec3::new(-1.0, 0.0, 1.0).normalize(), 1.0),
        // Parallel to the intent: after the first slide the corrected velocity
        // points into it, but the intent never did.
        contact(side, player, Vec3::NEG_Z, 1.0),
    ];

    let v = resolve_step(
        &body(Vec3::X),
        &step(player, &contacts),
        &KinematicTuning::default(),
        &NoProbe,
    );

    assert!((v.x - 0.5).abs() < 1e-5, "{v:?}");
    assert!((v.z - 0.5).abs() < 1e-5, "{v:?}");
}
