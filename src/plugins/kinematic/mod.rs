//! Kinematic body controller.
//!
//! The player is a dynamic avian body with gravity disabled. Each fixed step,
//! before the physics step runs, we take the velocity intent written by the
//! player plugin and correct it against the contacts avian reported for the
//! body:
//!
//! ```text
//! walls   (n.y <= 0.5, moving into them) -> slide along the contact plane
//! ground  (n.y >  0.5)                   -> highest contact wins, project onto its plane
//! no ground                              -> accumulate gravity
//! ```
//!
//! The correction itself is `resolve_step`, a pure function over
//! `ContactSample`s and a `GroundProbe`, so it can be tested without a physics
//! world.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::{KinematicTuning, Tunables};
use crate::plugins::player::apply_movement;

const EPS: f32 = 1e-6;
/// Contacts with a facing normal steeper than this count as ground.
const GROUND_NORMAL_Y: f32 = 0.5;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// Velocity intent, corrected in place every step.
    pub velocity: Vec3,
    pub enable_slopes: bool,
    pub enable_jumps: bool,
}

impl KinematicBody {
    pub fn new(tuning: &KinematicTuning) -> Self {
        Self {
            velocity: Vec3::ZERO,
            enable_slopes: tuning.enable_slopes,
            enable_jumps: tuning.enable_jumps,
        }
    }
}

/// One contact point between two colliders, in world space.
///
/// `normal` points from `body1` towards `body2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub body1: Entity,
    pub body2: Entity,
    pub normal: Vec3,
    pub point: Vec3,
    pub enabled: bool,
}

impl ContactSample {
    /// The other entity and the normal turned to face `entity`, if `entity`
    /// takes part in this contact.
    pub fn facing(&self, entity: Entity) -> Option<(Entity, Vec3)> {
        if self.body1 == entity {
            Some((self.body2, -self.normal))
        } else if self.body2 == entity {
            Some((self.body1, self.normal))
        } else {
            None
        }
    }
}

/// Downward probe against a single ground body.
pub trait GroundProbe {
    /// Surface normal of `ground` below `origin`, if it is hit within `max_distance`.
    fn ground_normal(&self, origin: Vec3, ground: Entity, max_distance: f32) -> Option<Vec3>;
}

impl GroundProbe for SpatialQuery<'_, '_> {
    fn ground_normal(&self, origin: Vec3, ground: Entity, max_distance: f32) -> Option<Vec3> {
        self.cast_ray_predicate(
            origin,
            Dir3::NEG_Y,
            max_distance,
            true,
            &SpatialQueryFilter::default(),
            &|e| e == ground,
        )
        .map(|hit| hit.normal)
    }
}

/// Everything one controller step reads besides the body itself.
pub struct Step<'a> {
    pub entity: Entity,
    pub origin: Vec3,
    pub contacts: &'a [ContactSample],
    pub gravity: Vec3,
    pub dt: Duration,
}

/// Corrected velocity for `body` after one step.
pub fn resolve_step(
    body: &KinematicBody,
    step: &Step,
    tuning: &KinematicTuning,
    probe: &impl GroundProbe,
) -> Vec3 {
    let mut v = body.velocity;
    // (height, ground entity, facing normal)
    let mut ground: Option<(f32, Entity, Vec3)> = None;

    for c in step.contacts.iter().filter(|c| c.enabled) {
        let Some((other, n)) = c.facing(step.entity) else {
            continue;
        };

        // Walls are judged against the intent, not the partly corrected velocity.
        if body.velocity.dot(n) < -EPS && n.y <= GROUND_NORMAL_Y {
            v -= n * v.dot(n);
        } else if n.y > GROUND_NORMAL_Y {
            let height = c.point.y.abs();
            if ground.is_none_or(|(best, ..)| height > best) {
                ground = Some((height, other, n));
            }
        }
    }

    let rising = body.enable_jumps && v.normalize_or_zero().y >= GROUND_NORMAL_Y;
    match ground {
        Some((_, entity, n)) if !rising => {
            let gn = ground_normal(body, n, entity, step.origin, tuning, probe);
            v - gn * v.dot(gn)
        }
        _ => v + step.gravity * (step.dt.as_secs_f32() * 1000.0) * tuning.gravity_per_ms,
    }
}

fn ground_normal(
    body: &KinematicBody,
    contact: Vec3,
    ground: Entity,
    origin: Vec3,
    tuning: &KinematicTuning,
    probe: &impl GroundProbe,
) -> Vec3 {
    if !body.enable_slopes {
        return Vec3::Y;
    }
    if contact.y >= 1.0 - EPS {
        return contact;
    }
    match probe.ground_normal(origin, ground, tuning.ground_probe_distance) {
        Some(hit) if hit.y.abs() > contact.y.abs() => hit,
        _ => contact,
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, step_bodies.after(apply_movement));
}

fn contact_samples(pair: &ContactPair) -> impl Iterator<Item = ContactSample> + '_ {
    let enabled = pair.is_touching();
    pair.manifolds.iter().flat_map(move |m| {
        m.points.iter().map(move |p| ContactSample {
            body1: pair.collider1,
            body2: pair.collider2,
            normal: m.normal,
            point: p.point,
            enabled,
        })
    })
}

fn step_bodies(
    time: Res<Time>,
    gravity: Res<Gravity>,
    tunables: Res<Tunables>,
    collisions: Collisions,
    spatial: SpatialQuery,
    mut q_bodies: Query<(
        Entity,
        &Transform,
        &mut KinematicBody,
        &mut LinearVelocity,
        &mut Position,
    )>,
) {
    let mut contacts = Vec::new();

    for (entity, tf, mut body, mut lin_vel, mut pos) in &mut q_bodies {
        if !body.enable_jumps {
            body.velocity.y = 0.0;
            lin_vel.y = 0.0;
        }
        pos.0 = tf.translation;

        contacts.clear();
        contacts.extend(collisions.collisions_with(entity).flat_map(contact_samples));

        let step = Step {
            entity,
            origin: tf.translation,
            contacts: &contacts,
            gravity: gravity.0,
            dt: time.delta(),
        };
        let v = resolve_step(&body, &step, &tunables.kinematic, &spatial);

        body.velocity = v;
        lin_vel.0 = v;
    }
}

#[cfg(test)]
mod tests;
