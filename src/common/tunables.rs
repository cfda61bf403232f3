//! Tunable gameplay constants.
//!
//! Everything the rules read lives here so tests and embedders can pre-insert
//! an override before the core plugin runs `init_resource`.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Fixed simulation rate. Per-tick speeds below assume this rate.
    pub tick_hz: f64,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub shield: ShieldTuning,
    pub zones: ZoneTuning,
    pub warrior: EnemyTuning,
    pub dragon: EnemyTuning,
    pub progression: ProgressionTuning,
    pub kinematic: KinematicTuning,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            player: PlayerTuning::default(),
            weapon: WeaponTuning::default(),
            shield: ShieldTuning::default(),
            zones: ZoneTuning::default(),
            warrior: EnemyTuning::warrior(),
            dragon: EnemyTuning::dragon(),
            progression: ProgressionTuning::default(),
            kinematic: KinematicTuning::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerTuning {
    pub start_health: u8,
    /// Health cap once the heal is unlocked.
    pub bonus_max_health: u8,
    /// Walking speed in units per second.
    pub move_speed: f32,
    pub spawn: Vec3,
    pub look_sensitivity: f32,
    /// Minimum per-tick displacement that counts as a footstep.
    pub footstep_threshold: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_health: 3,
            bonus_max_health: 4,
            move_speed: 7.5,
            spawn: Vec3::new(0.0, 0.0, 10.0),
            look_sensitivity: 0.003,
            footstep_threshold: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeaponTuning {
    pub magazine: u8,
    pub reload: Duration,
    /// Dart displacement per tick.
    pub dart_speed: f32,
    pub auto_fire_interval: Duration,
    /// Darts further than this from their spawn point are removed.
    pub max_travel: f32,
    pub hit_radius: f32,
    /// Hit tests aim at the enemy position raised by this much (torso height).
    pub torso_offset: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            magazine: 20,
            reload: Duration::from_millis(1500),
            dart_speed: 0.5,
            auto_fire_interval: Duration::from_millis(150),
            max_travel: 150.0,
            hit_radius: 2.0,
            torso_offset: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShieldTuning {
    pub duration: Duration,
    pub cooldown: Duration,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(5000),
            cooldown: Duration::from_millis(1000),
        }
    }
}

/// How many zones of one kind to scatter and how far apart.
#[derive(Debug, Clone, Copy)]
pub struct ZoneLayout {
    pub count: usize,
    pub min_separation: f32,
}

#[derive(Debug, Clone)]
pub struct ZoneTuning {
    /// Zones are scattered in `[-range, range]` on both planar axes.
    pub range: f32,
    pub placement_attempts: usize,
    pub bushes: ZoneLayout,
    pub water: ZoneLayout,
    pub hazards: ZoneLayout,
    pub bush_radius: f32,
    pub water_half_extent: f32,
    pub hazard_half_extent: f32,
    /// No hazard damage until this long after the session starts.
    pub hazard_grace: Duration,
    pub hazard_damage_cooldown: Duration,
    /// `None` seeds placement from entropy.
    pub seed: Option<u64>,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            range: 90.0,
            placement_attempts: 100,
            bushes: ZoneLayout { count: 50, min_separation: 5.0 },
            water: ZoneLayout { count: 25, min_separation: 15.0 },
            hazards: ZoneLayout { count: 9, min_separation: 15.0 },
            bush_radius: 2.5,
            water_half_extent: 10.0,
            hazard_half_extent: 5.0,
            hazard_grace: Duration::from_millis(2000),
            hazard_damage_cooldown: Duration::from_millis(1000),
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyTuning {
    pub max_health: i32,
    /// Chase displacement per tick.
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: Duration,
    pub movement_lock: Duration,
    /// Delay between the attack starting and the damage landing.
    pub strike_delay: Duration,
    pub spawn: Vec3,
    pub scale: f32,
}

impl EnemyTuning {
    pub fn warrior() -> Self {
        Self {
            max_health: 15,
            speed: 0.08,
            attack_range: 4.0,
            attack_cooldown: Duration::from_millis(1000),
            movement_lock: Duration::from_millis(500),
            strike_delay: Duration::from_millis(1000),
            spawn: Vec3::new(0.0, 0.0, -20.0),
            scale: 1.0,
        }
    }

    pub fn dragon() -> Self {
        Self {
            speed: 0.09,
            spawn: Vec3::new(0.0, 0.0, -30.0),
            scale: 6.0,
            ..Self::warrior()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressionTuning {
    pub pickup_radius: f32,
    pub drop_height: f32,
    /// Offset of the second warrior drop from the first.
    pub secondary_drop_offset: Vec3,
    /// Dragon strikes land only after this long past the stage transition.
    pub dragon_grace: Duration,
    pub banner: Duration,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            pickup_radius: 2.0,
            drop_height: 0.5,
            secondary_drop_offset: Vec3::X,
            dragon_grace: Duration::from_millis(1500),
            banner: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KinematicTuning {
    pub enable_slopes: bool,
    pub enable_jumps: bool,
    pub radius: f32,
    pub mass: f32,
    pub linear_damping: f32,
    /// Airborne bodies gain `gravity * dt_ms * gravity_per_ms` each step.
    pub gravity_per_ms: f32,
    /// Length of the downward probe used to refine slope normals.
    pub ground_probe_distance: f32,
}

impl Default for KinematicTuning {
    fn default() -> Self {
        Self {
            enable_slopes: true,
            enable_jumps: false,
            radius: 1.3,
            mass: 5.0,
            linear_damping: 0.05,
            gravity_per_ms: 0.04,
            ground_probe_distance: 2.6,
        }
    }
}
