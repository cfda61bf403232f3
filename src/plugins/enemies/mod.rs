//! Enemies plugin: the Warrior and the Dragon.
//!
//! Both kinds share one state machine (`brain`), parameterised by
//! `EnemyTuning`. Facts live in components (`Health`, `EnemyBrain`) and the
//! shared `MovementLock`; presentation reads `EnemyPose` only.
//!
//! ```text
//! OnEnter(InGame)          spawn the Warrior
//! Enemies set  forget_dead  EnemyDefeated -> release that enemy's movement lock
//!              drive        think() per enemy -> move / pose / lock / DamagePlayer
//! ```
//!
//! The Dragon is spawned by the progression plugin at stage two.

pub mod brain;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::{state::GameState, tunables::{EnemyTuning, Tunables}};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::{MovementLock, Player};
use crate::plugins::progression::Progression;
use crate::plugins::projectiles::EnemyDefeated;
use crate::plugins::session::SessionEntity;
use crate::plugins::vitals::{DamagePlayer, DamageSource, PlayerVitals};
use crate::plugins::zones::ZoneOccupancy;

pub use brain::{AttackState, EnemyBrain, EnemyPose, Perception, Thought};

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Warrior,
    Dragon,
}

impl EnemyKind {
    pub fn tuning(self, tunables: &Tunables) -> &EnemyTuning {
        match self {
            EnemyKind::Warrior => &tunables.warrior,
            EnemyKind::Dragon => &tunables.dragon,
        }
    }

    /// Animation clip played for each pose.
    pub fn clip(self, pose: EnemyPose) -> &'static str {
        match (self, pose) {
            (EnemyKind::Warrior, EnemyPose::Idle) => "Idle",
            (EnemyKind::Warrior, EnemyPose::Moving) => "Run",
            (EnemyKind::Warrior, EnemyPose::Attacking) => "Attack",
            (EnemyKind::Dragon, EnemyPose::Idle) => "Flying",
            (EnemyKind::Dragon, EnemyPose::Moving) => "Fast_Flying",
            (EnemyKind::Dragon, EnemyPose::Attacking) => "Punch",
        }
    }

    /// Strikes are withheld during the stage-two grace window.
    #[inline]
    pub fn respects_stage_grace(self) -> bool {
        self == EnemyKind::Dragon
    }

    fn damage_source(self) -> DamageSource {
        match self {
            EnemyKind::Warrior => DamageSource::Warrior,
            EnemyKind::Dragon => DamageSource::Dragon,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub hp: i32,
}

impl Health {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_warrior)
        .add_systems(
            FixedUpdate,
            (forget_dead, drive).chain().in_set(GameLoopSet::Enemies),
        );
}

/// Spawn an enemy of `kind` at its configured spawn point.
pub fn spawn_enemy(commands: &mut Commands, kind: EnemyKind, tunables: &Tunables) -> Entity {
    let t = kind.tuning(tunables);
    commands
        .spawn((
            Name::new(format!("{kind:?}")),
            Enemy,
            kind,
            Health { hp: t.max_health },
            EnemyBrain::new(t),
            EnemyPose::Idle,
            Transform::from_translation(t.spawn).with_scale(Vec3::splat(t.scale)),
            SessionEntity,
        ))
        .id()
}

fn spawn_warrior(mut commands: Commands, tunables: Res<Tunables>) {
    spawn_enemy(&mut commands, EnemyKind::Warrior, &tunables);
}

/// A defeated enemy gives up the lock; its pending strike dies with it.
pub fn forget_dead(mut defeated: MessageReader<EnemyDefeated>, mut lock: ResMut<MovementLock>) {
    for d in defeated.read() {
        lock.release(d.enemy);
    }
}

/// Read-only context every enemy decides from.
#[derive(SystemParam)]
pub struct EnemySenses<'w> {
    time: Res<'w, Time>,
    tunables: Res<'w, Tunables>,
    occupancy: Res<'w, ZoneOccupancy>,
    progression: Res<'w, Progression>,
    vitals: Res<'w, PlayerVitals>,
}

impl EnemySenses<'_> {
    /// A strike lands unless the player is already down or the Dragon is
    /// still inside its stage-two grace window.
    fn strike_withheld(&self, kind: EnemyKind) -> bool {
        let grace = kind.respects_stage_grace()
            && self.progression.dragon_grace.is_active(self.time.elapsed());
        self.vitals.is_dead() || grace
    }
}

pub fn drive(
    senses: EnemySenses,
    mut lock: ResMut<MovementLock>,
    mut damage: MessageWriter<DamagePlayer>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(Entity, &EnemyKind, &mut EnemyBrain, &mut EnemyPose, &mut Transform), With<Enemy>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let now = senses.time.elapsed();

    for (e, kind, mut brain, mut pose, mut tf) in &mut q_enemies {
        let seen = Perception {
            enemy: tf.translation,
            player: player.translation,
            concealed: senses.occupancy.concealed,
        };
        let thought = brain.think(now, &seen, kind.tuning(&senses.tunables));

        if thought.release_lock {
            lock.release(e);
        }
        if thought.acquire_lock {
            lock.acquire(e);
        }

        if thought.strike {
            if senses.strike_withheld(*kind) {
                debug!("{kind:?} strike withheld");
            } else {
                damage.write(DamagePlayer { source: kind.damage_source() });
            }
        }

        tf.translation += thought.step;
        if let Some(yaw) = thought.yaw {
            tf.rotation = Quat::from_rotation_y(yaw);
        }
        if let Some(p) = thought.pose {
            pose.set_if_neq(p);
        }
    }
}

#[cfg(test)]
mod tests;
