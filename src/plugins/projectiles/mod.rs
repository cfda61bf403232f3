//! Projectiles plugin: darts fired by the player.
//!
//! # Data flow
//! ```text
//! Actions      weapon::fire            -> SpawnDart message
//! Projectiles  spawn_darts             SpawnDart -> Dart entity at the eye
//!              advance_darts           position += velocity (per tick)
//!              resolve_hits            dart within hit_radius of an enemy torso:
//!                                        despawn dart, health -= 1,
//!                                        at 0: EnemyDefeated + despawn enemy
//!              cull_darts              despawn darts past max_travel
//! ```
//!
//! Hits are plain distance tests, not physics contacts. Darts move a fixed
//! distance per tick, so their speed is tied to the fixed tick rate.

pub mod components;
pub mod messages;

use bevy::prelude::*;

use crate::common::spatial::within_radius;
use crate::common::tunables::Tunables;
use crate::plugins::core::GameLoopSet;
use crate::plugins::enemies::{Enemy, EnemyKind, Health};
use crate::plugins::player::LookAngles;
use crate::plugins::session::SessionEntity;

pub use components::Dart;
pub use messages::{EnemyDefeated, SpawnDart};

/// Per-tick dart velocity for a camera looking along `look`.
pub fn dart_velocity(look: LookAngles, speed: f32) -> Vec3 {
    let theta = look.yaw + std::f32::consts::PI;
    let (sin_p, cos_p) = look.pitch.sin_cos();
    let horizontal = speed * cos_p;
    Vec3::new(horizontal * theta.sin(), speed * sin_p, horizontal * theta.cos())
}

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnDart>()
        .add_message::<EnemyDefeated>()
        .add_systems(
            FixedUpdate,
            (spawn_darts, advance_darts, resolve_hits, cull_darts)
                .chain()
                .in_set(GameLoopSet::Projectiles),
        );
}

pub fn spawn_darts(mut commands: Commands, mut requests: MessageReader<SpawnDart>) {
    for req in requests.read() {
        commands.spawn((
            Name::new("Dart"),
            Dart { velocity: req.velocity, origin: req.origin },
            Transform::from_translation(req.origin),
            SessionEntity,
        ));
    }
}

pub fn advance_darts(mut q_darts: Query<(&Dart, &mut Transform)>) {
    for (dart, mut tf) in &mut q_darts {
        tf.translation += dart.velocity;
    }
}

pub fn resolve_hits(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_darts: Query<(Entity, &Transform), With<Dart>>,
    mut q_enemies: Query<(Entity, &Transform, &EnemyKind, &mut Health), (With<Enemy>, Without<Dart>)>,
    mut defeated: MessageWriter<EnemyDefeated>,
) {
    let w = &tunables.weapon;

    for (dart, dart_tf) in &q_darts {
        let hit = q_enemies.iter_mut().find(|(_, tf, _, health)| {
            health.is_alive()
                && within_radius(
                    dart_tf.translation,
                    tf.translation + Vec3::Y * w.torso_offset,
                    w.hit_radius,
                )
        });
        let Some((enemy, enemy_tf, kind, mut health)) = hit else {
            continue;
        };

        commands.entity(dart).despawn();
        health.hp -= 1;
        debug!("Dart hit {kind:?}, {} left", health.hp);

        if !health.is_alive() {
            info!("{kind:?} defeated");
            defeated.write(EnemyDefeated {
                enemy,
                kind: *kind,
                position: enemy_tf.translation,
            });
            commands.entity(enemy).despawn();
        }
    }
}

pub fn cull_darts(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_darts: Query<(Entity, &Dart, &Transform)>,
) {
    let max = tunables.weapon.max_travel;
    for (e, dart, tf) in &q_darts {
        if dart.travelled(tf.translation) > max {
            commands.entity(e).despawn();
        }
    }
}
