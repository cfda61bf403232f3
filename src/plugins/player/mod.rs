//! Player plugin.
//!
//! Pipeline:
//! - Update: sample keyboard/mouse, write `PlayerInput` (locomotion + look) and
//!   latch discrete actions into `ControlInput`
//! - FixedUpdate: turn the move axis into the kinematic body's velocity intent,
//!   unless an enemy holds the movement lock
//!
//! The player entity's translation is the centre of its collision sphere; the
//! camera ("eye") sits `eye_offset` above it.

use avian3d::prelude::*;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::kinematic::KinematicBody;
use crate::plugins::session::SessionEntity;

/// Height of the eye above the body centre.
pub const EYE_OFFSET: f32 = 0.3;

#[derive(Component)]
pub struct Player;

/// Camera orientation in radians. Yaw 0 looks down -Z, positive pitch looks up.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    pub fn rotation(self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit vectors on the ground plane for forward and right.
    pub fn planar_basis(self) -> (Vec3, Vec3) {
        let (sin, cos) = self.yaw.sin_cos();
        (Vec3::new(-sin, 0.0, -cos), Vec3::new(cos, 0.0, -sin))
    }
}

/// World position of the player's camera.
#[inline]
pub fn eye_position(tf: &Transform) -> Vec3 {
    tf.translation + Vec3::Y * EYE_OFFSET
}

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

/// Discrete actions sampled every frame and consumed by the fixed tick.
///
/// Presses and releases are latched until a fixed step takes them, so a frame
/// without a fixed step does not lose an edge.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct ControlInput {
    pub fire_held: bool,
    pub fire_pressed: bool,
    pub block_pressed: bool,
    pub block_released: bool,
    pub heal_pressed: bool,
}

impl ControlInput {
    #[inline]
    pub fn take(flag: &mut bool) -> bool {
        std::mem::take(flag)
    }
}

/// Shared "player cannot walk" capability.
///
/// Each enemy holds it under its own entity, so one enemy releasing never frees
/// a lock another enemy still holds.
#[derive(Resource, Default, Debug)]
pub struct MovementLock {
    holders: HashSet<Entity>,
}

impl MovementLock {
    /// Returns `false` if `holder` already had it.
    pub fn acquire(&mut self, holder: Entity) -> bool {
        self.holders.insert(holder)
    }

    pub fn release(&mut self, holder: Entity) -> bool {
        self.holders.remove(&holder)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        !self.holders.is_empty()
    }

    pub fn clear(&mut self) {
        self.holders.clear();
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<ControlInput>()
        .init_resource::<MovementLock>()
        .add_systems(OnEnter(GameState::InGame), (spawn, reset_controls))
        .add_systems(Update, (gather_input, gather_look))
        .add_systems(FixedUpdate, apply_movement);
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::World]);
    let k = &tunables.kinematic;
    let spawn = tunables.player.spawn + Vec3::Y * k.radius;

    commands.spawn((
        Name::new("Player"),
        Player,
        LookAngles::default(),
        KinematicBody::new(k),
        Transform::from_translation(spawn),
        RigidBody::Dynamic,
        Collider::sphere(k.radius),
        LockedAxes::ROTATION_LOCKED,
        GravityScale(0.0),
        Mass(k.mass),
        LinearDamping(k.linear_damping),
        layers,
        LinearVelocity::ZERO,
        SessionEntity,
    ));
}

fn reset_controls(mut controls: ResMut<ControlInput>, mut lock: ResMut<MovementLock>) {
    *controls = ControlInput::default();
    lock.clear();
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut input: ResMut<PlayerInput>,
    mut controls: ResMut<ControlInput>,
) {
    if let Some(keys) = keys {
        let mut axis = Vec2::ZERO;

        if keys.pressed(KeyCode::KeyW) {
            axis.y += 1.0;
        }
        if keys.pressed(KeyCode::KeyS) {
            axis.y -= 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            axis.x -= 1.0;
        }
        if keys.pressed(KeyCode::KeyD) {
            axis.x += 1.0;
        }

        input.move_axis = axis.normalize_or_zero();
        controls.heal_pressed |= keys.just_pressed(KeyCode::KeyE);
    }

    if let Some(buttons) = buttons {
        controls.fire_held = buttons.pressed(MouseButton::Left);
        controls.fire_pressed |= buttons.just_pressed(MouseButton::Left);
        controls.block_pressed |= buttons.just_pressed(MouseButton::Right);
        controls.block_released |= buttons.just_released(MouseButton::Right);
    }
}

fn gather_look(
    motion: Option<Res<AccumulatedMouseMotion>>,
    tunables: Res<Tunables>,
    state: Res<State<GameState>>,
    mut q_player: Query<&mut LookAngles, With<Player>>,
) {
    let Some(motion) = motion else { return; };
    if *state.get() != GameState::InGame || motion.delta == Vec2::ZERO {
        return;
    }
    let Ok(mut look) = q_player.single_mut() else { return; };

    let s = tunables.player.look_sensitivity;
    look.yaw -= motion.delta.x * s;
    look.pitch = (look.pitch - motion.delta.y * s).clamp(-1.5, 1.5);
}

/// Write the horizontal velocity intent. Vertical intent is left to the
/// kinematic controller.
pub fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    lock: Res<MovementLock>,
    state: Res<State<GameState>>,
    mut q_player: Query<(&LookAngles, &mut KinematicBody), With<Player>>,
) {
    let Ok((look, mut body)) = q_player.single_mut() else {
        return;
    };

    let planar = if lock.is_locked() || *state.get() != GameState::InGame {
        Vec3::ZERO
    } else {
        let (forward, right) = look.planar_basis();
        (forward * input.move_axis.y + right * input.move_axis.x) * tunables.player.move_speed
    };

    body.velocity.x = planar.x;
    body.velocity.z = planar.z;
}
