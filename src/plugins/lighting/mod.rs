//! Lighting (render-only): a shadow-casting sun and a soft fill light.

use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Fill"),
        DirectionalLight {
            color: Color::srgb(0.7, 0.8, 1.0),
            illuminance: 2_500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-30.0, 40.0, -50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
