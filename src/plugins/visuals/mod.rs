//! Visuals (render-only): meshes and materials for gameplay entities.
//!
//! Gameplay spawns bare entities (transform + rule components). This plugin
//! notices them with `Added<...>` and attaches something to look at, so the
//! rules never depend on assets.
//!
//! Presentation is derived from facts:
//! - enemy colour from `EnemyPose`, plus a white flash when `Health` drops
//! - a red screen flash when the player loses health

use bevy::prelude::*;

use crate::plugins::enemies::{Enemy, EnemyKind, EnemyPose, Health};
use crate::plugins::progression::{DroppedItem, ItemKind};
use crate::plugins::projectiles::Dart;
use crate::plugins::vitals::PlayerVitals;
use crate::plugins::world::ArenaBlock;
use crate::plugins::zones::{Zone, ZoneKind};
use crate::common::tunables::Tunables;

/// Per-enemy look: its own material plus a decaying hit flash in [0..1].
#[derive(Component, Debug, Clone)]
struct EnemyLook {
    material: Handle<StandardMaterial>,
    flash: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct ScreenFlash(f32);

#[derive(Resource)]
struct SharedMeshes {
    dart: Handle<Mesh>,
    dart_material: Handle<StandardMaterial>,
    item: Handle<Mesh>,
}

const FLASH_DECAY_PER_SEC: f32 = 5.0;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, (load_shared, spawn_screen_flash))
        .add_systems(
            Update,
            (
                dress_blocks,
                dress_zones,
                dress_enemies,
                dress_darts,
                dress_items,
                flash_enemies_on_hit,
                tint_enemies,
                spin_items,
                flash_screen_on_damage,
            ),
        );
}

fn load_shared(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(SharedMeshes {
        dart: meshes.add(Sphere::new(0.12)),
        dart_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.85, 0.2),
            emissive: LinearRgba::rgb(4.0, 3.0, 0.5),
            ..default()
        }),
        item: meshes.add(Cuboid::new(0.6, 0.6, 0.6)),
    });
}

fn dress_blocks(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<(Entity, &Name, &ArenaBlock), Added<ArenaBlock>>,
) {
    for (e, name, block) in &q {
        let color = if name.as_str() == "Ground" {
            Color::srgb(0.32, 0.45, 0.25)
        } else {
            Color::srgb(0.45, 0.42, 0.38)
        };
        commands.entity(e).insert((
            Mesh3d(meshes.add(Cuboid::from_size(block.size))),
            MeshMaterial3d(materials.add(color)),
        ));
    }
}

fn dress_zones(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tunables: Res<Tunables>,
    q: Query<(Entity, &Zone), Added<Zone>>,
) {
    let z = &tunables.zones;
    for (e, zone) in &q {
        let (mesh, material, lift) = match zone.kind {
            ZoneKind::Bush => (
                meshes.add(Sphere::new(z.bush_radius)),
                materials.add(Color::srgb(0.15, 0.5, 0.15)),
                0.0,
            ),
            ZoneKind::Water => (
                meshes.add(Plane3d::default().mesh().size(z.water_half_extent * 2.0, z.water_half_extent * 2.0)),
                materials.add(StandardMaterial {
                    base_color: Color::srgba(0.15, 0.35, 0.8, 0.75),
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                }),
                0.02,
            ),
            ZoneKind::Hazard => (
                meshes.add(Plane3d::default().mesh().size(z.hazard_half_extent * 2.0, z.hazard_half_extent * 2.0)),
                materials.add(StandardMaterial {
                    base_color: Color::srgb(0.6, 0.1, 0.05),
                    emissive: LinearRgba::rgb(1.5, 0.2, 0.0),
                    ..default()
                }),
                0.03,
            ),
        };
        // Bushes are squashed domes; flat zones sit just above the ground.
        let scale = if zone.kind == ZoneKind::Bush { Vec3::new(1.0, 0.6, 1.0) } else { Vec3::ONE };
        commands.entity(e).with_child((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, lift, 0.0).with_scale(scale),
        ));
    }
}

fn dress_enemies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<(Entity, &EnemyKind), Added<Enemy>>,
) {
    for (e, kind) in &q {
        let material = materials.add(pose_color(*kind, EnemyPose::Idle));
        commands
            .entity(e)
            .insert(EnemyLook { material: material.clone(), flash: 0.0 })
            .with_child((
                Mesh3d(meshes.add(Capsule3d::new(0.5, 1.2))),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, 1.1, 0.0),
            ));
    }
}

fn pose_color(kind: EnemyKind, pose: EnemyPose) -> Color {
    let base = match kind {
        EnemyKind::Warrior => Color::srgb(0.55, 0.35, 0.2),
        EnemyKind::Dragon => Color::srgb(0.35, 0.1, 0.45),
    };
    match pose {
        EnemyPose::Idle => base.darker(0.1),
        EnemyPose::Moving => base,
        EnemyPose::Attacking => base.lighter(0.25),
    }
}

fn dress_darts(mut commands: Commands, shared: Res<SharedMeshes>, q: Query<Entity, Added<Dart>>) {
    for e in &q {
        commands.entity(e).insert((
            Mesh3d(shared.dart.clone()),
            MeshMaterial3d(shared.dart_material.clone()),
        ));
    }
}

fn dress_items(
    mut commands: Commands,
    shared: Res<SharedMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q: Query<(Entity, &DroppedItem), Added<DroppedItem>>,
) {
    for (e, item) in &q {
        let color = match item.kind {
            ItemKind::Potion => Color::srgb(0.9, 0.1, 0.25),
            ItemKind::Smg => Color::srgb(0.2, 0.2, 0.22),
            ItemKind::Artifact => Color::srgb(1.0, 0.8, 0.1),
        };
        commands.entity(e).insert((
            Mesh3d(shared.item.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * 0.5,
                ..default()
            })),
        ));
    }
}

fn flash_enemies_on_hit(mut q: Query<(&mut EnemyLook, Ref<Health>)>) {
    for (mut look, health) in &mut q {
        if health.is_changed() && !health.is_added() {
            look.flash = 1.0;
        }
    }
}

fn tint_enemies(
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q: Query<(&EnemyKind, Ref<EnemyPose>, &mut EnemyLook)>,
) {
    let dt = time.delta_secs();
    for (kind, pose, mut look) in &mut q {
        if pose.is_changed() {
            debug!("{kind:?} clip: {}", kind.clip(*pose));
        }
        let Some(mat) = materials.get_mut(&look.material) else {
            continue;
        };
        mat.base_color = pose_color(*kind, *pose);
        mat.emissive = LinearRgba::WHITE * (look.flash * 2.0);
        if look.flash > 0.0 {
            look.flash = (look.flash - FLASH_DECAY_PER_SEC * dt).max(0.0);
        }
    }
}

fn spin_items(time: Res<Time>, mut q: Query<&mut Transform, With<DroppedItem>>) {
    for mut tf in &mut q {
        tf.rotate_y(1.5 * time.delta_secs());
    }
}

fn spawn_screen_flash(mut commands: Commands) {
    commands.spawn((
        Name::new("ScreenFlash"),
        ScreenFlash(0.0),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        GlobalZIndex(10),
    ));
}

fn flash_screen_on_damage(
    time: Res<Time>,
    vitals: Res<PlayerVitals>,
    mut last_health: Local<Option<u8>>,
    mut q: Query<(&mut ScreenFlash, &mut BackgroundColor)>,
) {
    let Ok((mut flash, mut bg)) = q.single_mut() else {
        return;
    };

    if last_health.is_some_and(|h| vitals.health < h) {
        flash.0 = 1.0;
    }
    *last_health = Some(vitals.health);

    flash.0 = (flash.0 - FLASH_DECAY_PER_SEC * time.delta_secs()).max(0.0);
    bg.0 = Color::srgba(0.8, 0.0, 0.0, 0.35 * flash.0);
}
