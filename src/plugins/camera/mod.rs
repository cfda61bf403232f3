//! First-person camera (render-only).
//!
//! The camera is its own entity that follows the player's eye. Fixed ticks
//! move the player in steps, so translation is eased toward the eye while the
//! rotation is copied straight from `LookAngles`.
//!
//! Player and camera transforms are accessed through disjoint queries
//! (`Without<...>` filters), so both can be borrowed in one system.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::common::state::GameState;
use crate::plugins::player::{eye_position, LookAngles, Player};

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera)
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(
            PostUpdate,
            follow_player.before(TransformSystems::Propagate),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            ..default()
        }),
        MainCamera { responsiveness: 30.0 },
        Transform::from_xyz(0.0, 1.6, 10.0),
    ));
}

fn set_cursor(q_window: &mut Query<&mut CursorOptions, With<PrimaryWindow>>, grab: bool) {
    let Ok(mut cursor) = q_window.single_mut() else {
        return;
    };
    cursor.grab_mode = if grab { CursorGrabMode::Locked } else { CursorGrabMode::None };
    cursor.visible = !grab;
}

fn grab_cursor(mut q_window: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    set_cursor(&mut q_window, true);
}

fn release_cursor(mut q_window: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    set_cursor(&mut q_window, false);
}

fn follow_player(
    time: Res<Time>,
    q_player: Query<(&Transform, &LookAngles, Ref<Player>), Without<MainCamera>>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Ok((tf_player, look, player)) = q_player.single() else {
        return;
    };
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    // A freshly spawned player: jump to it instead of easing across the arena.
    let alpha = if player.is_added() {
        1.0
    } else {
        1.0 - (-cam.responsiveness * time.delta_secs()).exp()
    };
    let eye = eye_position(tf_player);
    tf_cam.translation = tf_cam.translation.lerp(eye, alpha);
    tf_cam.rotation = look.rotation();
}
