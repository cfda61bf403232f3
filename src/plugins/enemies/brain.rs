//! Per-enemy attack state machine.
//!
//! ```text
//!            concealed player                     in range, cooldown ready
//!   Idle <-------------------- Chasing ----------------------------------> Attacking
//!     \________________________/  ^                                          |
//!        player visible again     |______ strike fires (strike_delay) _______|
//! ```
//!
//! `think` is pure over the brain and a `Perception`; the system applies the
//! returned `Thought` to the world (transform, pose, movement lock, damage).

use std::time::Duration;

use bevy::prelude::*;

use crate::common::cooldown::{CooldownGate, Deadline};
use crate::common::spatial::{planar_distance, yaw_towards};
use crate::common::tunables::EnemyTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackState {
    #[default]
    Idle,
    Chasing,
    Attacking,
}

/// Animation the renderer should be playing.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyPose {
    #[default]
    Idle,
    Moving,
    Attacking,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    pub state: AttackState,
    pub cooldown: CooldownGate,
    /// Whether this enemy currently holds the player's movement lock.
    pub lock_owned: bool,
    pub lock_release: Deadline,
    pub strike: Deadline,
}

impl EnemyBrain {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            state: AttackState::Idle,
            cooldown: CooldownGate::new(tuning.attack_cooldown),
            lock_owned: false,
            lock_release: Deadline::default(),
            strike: Deadline::default(),
        }
    }

    #[inline]
    pub fn attack_in_flight(&self) -> bool {
        self.strike.is_pending()
    }

    pub fn think(&mut self, now: Duration, seen: &Perception, tuning: &EnemyTuning) -> Thought {
        let mut out = Thought::default();

        if self.lock_owned && self.lock_release.fire(now) {
            self.lock_owned = false;
            out.release_lock = true;
        }

        if self.strike.fire(now) {
            self.state = AttackState::Chasing;
            out.strike = true;
            return out;
        }

        if self.state == AttackState::Attacking {
            return out;
        }

        if seen.concealed {
            self.state = AttackState::Idle;
            out.pose = Some(EnemyPose::Idle);
            return out;
        }

        out.yaw = Some(yaw_towards(seen.enemy, seen.player));

        if planar_distance(seen.enemy, seen.player) < tuning.attack_range {
            if self.cooldown.try_take(now) {
                self.state = AttackState::Attacking;
                self.strike.schedule(now, tuning.strike_delay);
                out.pose = Some(EnemyPose::Attacking);

                if !self.lock_owned {
                    self.lock_owned = true;
                    self.lock_release.schedule(now, tuning.movement_lock);
                    out.acquire_lock = true;
                }
            }
            return out;
        }

        self.state = AttackState::Chasing;
        let mut dir = seen.player - seen.enemy;
        dir.y = 0.0;
        out.step = dir.normalize_or_zero() * tuning.speed;
        out.pose = Some(EnemyPose::Moving);
        out
    }
}

/// What an enemy knows this tick.
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    pub enemy: Vec3,
    pub player: Vec3,
    /// Player stands in a bush or water zone.
    pub concealed: bool,
}

/// What an enemy decided this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thought {
    pub step: Vec3,
    pub yaw: Option<f32>,
    pub pose: Option<EnemyPose>,
    pub acquire_lock: bool,
    pub release_lock: bool,
    /// A scheduled strike landed this tick.
    pub strike: bool,
}
