//! Enemy tests.
//!
//! The state machine is exercised directly through `think`; the system tests
//! run `drive` once per simulated tick against a hand-built world.

use std::time::Duration;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{advance_time, ms, run_system_once, time_at};

fn warrior() -> EnemyTuning {
    EnemyTuning::warrior()
}

fn near(concealed: bool) -> Perception {
    Perception { enemy: Vec3::ZERO, player: Vec3::new(0.0, 1.3, 3.0), concealed }
}

fn far() -> Perception {
    Perception { enemy: Vec3::ZERO, player: Vec3::new(0.0, 1.3, 10.0), concealed: false }
}

#[test]
fn chases_at_fixed_speed_facing_the_player() {
    let mut brain = EnemyBrain::new(&warrior());
    let t = brain.think(ms(0), &far(), &warrior());

    assert_eq!(brain.state, AttackState::Chasing);
    assert!(t.step.abs_diff_eq(Vec3::new(0.0, 0.0, 0.08), 1e-6), "{:?}", t.step);
    assert_eq!(t.yaw, Some(0.0));
    assert_eq!(t.pose, Some(EnemyPose::Moving));
}

#[test]
fn attack_schedules_one_strike_and_locks_once() {
    let tuning = warrior();
    let mut brain = EnemyBrain::new(&tuning);

    let t = brain.think(ms(2000), &near(false), &tuning);
    assert_eq!(brain.state, AttackState::Attacking);
    assert_eq!(t.pose, Some(EnemyPose::Attacking));
    assert!(t.acquire_lock);
    assert_eq!(t.step, Vec3::ZERO);

    // Mid-attack: nothing new happens.
    let t = brain.think(ms(2400), &near(false), &tuning);
    assert_eq!(t, Thought::default());

    // Lock released at +500 ms.
    let t = brain.think(ms(2500), &near(false), &tuning);
    assert!(t.release_lock && !t.strike);

    // Strike lands at +1000 ms, exactly once.
    let t = brain.think(ms(3000), &near(false), &tuning);
    assert!(t.strike);
    assert_eq!(brain.state, AttackState::Chasing);
    assert!(!brain.attack_in_flight());
}

#[test]
fn cooldown_gates_the_next_attack() {
    let tuning = EnemyTuning { strike_delay: ms(100), ..warrior() };
    let mut brain = EnemyBrain::new(&tuning);

    brain.think(ms(0), &near(false), &tuning);
    assert!(brain.think(ms(100), &near(false), &tuning).strike);

    // In range but cooling down: hold position, no new attack.
    let t = brain.think(ms(500), &near(false), &tuning);
    assert_eq!(t.step, Vec3::ZERO);
    assert!(!brain.attack_in_flight());

    brain.think(ms(1000), &near(false), &tuning);
    assert!(brain.attack_in_flight());
}

#[test]
fn concealment_idles_but_in_flight_strike_still_lands() {
    let tuning = warrior();
    let mut brain = EnemyBrain::new(&tuning);
    brain.think(ms(0), &near(false), &tuning);

    let t = brain.think(ms(1000), &near(true), &tuning);
    assert!(t.strike);

    let t = brain.think(ms(1016), &near(true), &tuning);
    assert_eq!(brain.state, AttackState::Idle);
    assert_eq!(t.pose, Some(EnemyPose::Idle));
    assert_eq!(t.step, Vec3::ZERO);

    // Even in range and off cooldown: no attack while concealed.
    let t = brain.think(ms(5000), &near(true), &tuning);
    assert!(!brain.attack_in_flight());
    assert_eq!(t.pose, Some(EnemyPose::Idle));
}

#[test]
fn lock_is_not_reacquired_while_owned() {
    let tuning = EnemyTuning { movement_lock: ms(5000), strike_delay: ms(10), ..warrior() };
    let mut brain = EnemyBrain::new(&tuning);

    assert!(brain.think(ms(0), &near(false), &tuning).acquire_lock);
    brain.think(ms(10), &near(false), &tuning);
    let t = brain.think(ms(1000), &near(false), &tuning);
    assert!(brain.attack_in_flight());
    assert!(!t.acquire_lock);
}

#[test]
fn clip_names_follow_kind_and_pose() {
    assert_eq!(EnemyKind::Warrior.clip(EnemyPose::Moving), "Run");
    assert_eq!(EnemyKind::Dragon.clip(EnemyPose::Attacking), "Punch");
}

// --------------------------------------------------------------------------------------
// System tests
// --------------------------------------------------------------------------------------

struct Arena {
    world: World,
}

impl Arena {
    fn new(player_at: Vec3) -> Self {
        let mut world = World::new();
        time_at(&mut world, ms(10_000));
        world.insert_resource(Tunables::default());
        world.init_resource::<ZoneOccupancy>();
        world.init_resource::<Progression>();
        world.insert_resource(PlayerVitals::new(3));
        world.init_resource::<MovementLock>();
        world.init_resource::<Messages<DamagePlayer>>();
        world.init_resource::<Messages<EnemyDefeated>>();
        world.spawn((Player, Transform::from_translation(player_at)));
        Self { world }
    }

    fn spawn(&mut self, kind: EnemyKind, at: Vec3) -> Entity {
        let t = kind.tuning(&Tunables::default()).clone();
        self.world
            .spawn((
                Enemy,
                kind,
                Health { hp: t.max_health },
                EnemyBrain::new(&t),
                EnemyPose::Idle,
                Transform::from_translation(at),
            ))
            .id()
    }

    fn tick(&mut self, dt: Duration) {
        advance_time(&mut self.world, dt);
        run_system_once(&mut self.world, forget_dead);
        run_system_once(&mut self.world, drive);
    }

    fn hits(&mut self) -> Vec<DamagePlayer> {
        self.world.resource_mut::<Messages<DamagePlayer>>().drain().collect()
    }
}

#[test]
fn warrior_strike_reaches_the_player_after_delay() {
    let mut arena = Arena::new(Vec3::new(0.0, 1.3, 2.0));
    let warrior = arena.spawn(EnemyKind::Warrior, Vec3::ZERO);

    arena.tick(ms(16));
    assert!(arena.world.resource::<MovementLock>().is_locked());
    assert_eq!(*arena.world.get::<EnemyPose>(warrior).unwrap(), EnemyPose::Attacking);

    arena.tick(ms(500));
    assert!(!arena.world.resource::<MovementLock>().is_locked());
    assert!(arena.hits().is_empty());

    arena.tick(ms(500));
    assert_eq!(arena.hits(), vec![DamagePlayer { source: DamageSource::Warrior }]);
}

#[test]
fn dragon_strike_is_withheld_during_grace() {
    let mut arena = Arena::new(Vec3::new(0.0, 1.3, 2.0));
    arena.world.resource_mut::<Progression>().dragon_grace.schedule(ms(10_000), ms(1500));
    arena.spawn(EnemyKind::Dragon, Vec3::ZERO);

    arena.tick(ms(16));
    arena.tick(ms(1000));
    assert!(arena.hits().is_empty(), "strike at +1016 ms falls inside the grace window");

    // Next attack after the cooldown lands once grace is over.
    arena.tick(ms(1000));
    arena.tick(ms(1000));
    assert_eq!(arena.hits(), vec![DamagePlayer { source: DamageSource::Dragon }]);
}

#[test]
fn chasing_enemy_walks_towards_player() {
    let mut arena = Arena::new(Vec3::new(0.0, 1.3, 10.0));
    let warrior = arena.spawn(EnemyKind::Warrior, Vec3::new(0.0, 0.0, -20.0));

    for _ in 0..10 {
        arena.tick(ms(16));
    }

    let tf = arena.world.get::<Transform>(warrior).unwrap();
    assert!((tf.translation.z - (-20.0 + 0.8)).abs() < 1e-4);
    assert_eq!(tf.translation.y, 0.0);
    assert_eq!(*arena.world.get::<EnemyPose>(warrior).unwrap(), EnemyPose::Moving);
}

#[test]
fn defeated_enemy_releases_its_lock() {
    let mut arena = Arena::new(Vec3::new(0.0, 1.3, 2.0));
    let warrior = arena.spawn(EnemyKind::Warrior, Vec3::ZERO);
    arena.tick(ms(16));
    assert!(arena.world.resource::<MovementLock>().is_locked());

    arena.world.write_message(EnemyDefeated {
        enemy: warrior,
        kind: EnemyKind::Warrior,
        position: Vec3::ZERO,
    });
    arena.world.despawn(warrior);
    arena.tick(ms(16));

    assert!(!arena.world.resource::<MovementLock>().is_locked());
}

#[test]
fn no_strike_once_the_player_is_dead() {
    let mut arena = Arena::new(Vec3::new(0.0, 1.3, 2.0));
    arena.spawn(EnemyKind::Warrior, Vec3::ZERO);
    arena.tick(ms(16));
    arena.world.resource_mut::<PlayerVitals>().health = 0;
    arena.tick(ms(1000));

    assert!(arena.hits().is_empty());
}
