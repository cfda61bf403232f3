//! Bushes, water and hazard zones.
//!
//! Zones are static footprints on the ground plane, scattered at the start of
//! every session. Each tick we record which kinds the player stands in:
//! bushes and water conceal the player (no firing, enemies lose track), hazard
//! zones block firing and shielding and hurt on a cooldown.

use std::time::Duration;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::cooldown::CooldownGate;
use crate::common::spatial::{Bounds, Footprint};
use crate::common::state::GameState;
use crate::common::tunables::{Tunables, ZoneLayout, ZoneTuning};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::Player;
use crate::plugins::session::{SessionClock, SessionEntity};
use crate::plugins::vitals::{apply_damage, DamagePlayer, DamageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Bush,
    Water,
    Hazard,
}

impl ZoneKind {
    #[inline]
    pub fn conceals(self) -> bool {
        matches!(self, ZoneKind::Bush | ZoneKind::Water)
    }

    pub fn footprint(self, tuning: &ZoneTuning) -> Footprint {
        match self {
            ZoneKind::Bush => Footprint::Circle { radius: tuning.bush_radius },
            ZoneKind::Water => Footprint::Rect {
                half_extents: Vec2::splat(tuning.water_half_extent),
                bounds: Bounds::Open,
            },
            ZoneKind::Hazard => Footprint::Rect {
                half_extents: Vec2::splat(tuning.hazard_half_extent),
                bounds: Bounds::Closed,
            },
        }
    }

    fn layout(self, tuning: &ZoneTuning) -> ZoneLayout {
        match self {
            ZoneKind::Bush => tuning.bushes,
            ZoneKind::Water => tuning.water,
            ZoneKind::Hazard => tuning.hazards,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub footprint: Footprint,
}

/// Where the player stands this tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneOccupancy {
    pub concealed: bool,
    pub in_hazard: bool,
}

impl ZoneOccupancy {
    pub fn of<'a>(zones: impl IntoIterator<Item = (&'a Zone, Vec3)>, point: Vec3) -> Self {
        zones
            .into_iter()
            .filter(|(zone, center)| zone.footprint.contains(*center, point))
            .fold(Self::default(), |mut acc, (zone, _)| {
                acc.concealed |= zone.kind.conceals();
                acc.in_hazard |= zone.kind == ZoneKind::Hazard;
                acc
            })
    }
}

/// Hazard damage cooldown.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HazardExposure(pub CooldownGate);

/// Rejection-sample `layout.count` planar positions in `[-range, range]²`.
///
/// A candidate is rejected while it lies closer than `min_separation` to an
/// already placed one. After `attempts` tries the last candidate is kept.
pub fn scatter(rng: &mut impl Rng, layout: ZoneLayout, range: f32, attempts: usize) -> Vec<Vec2> {
    let mut placed: Vec<Vec2> = Vec::with_capacity(layout.count);
    let min_sq = layout.min_separation * layout.min_separation;

    for _ in 0..layout.count {
        let mut candidate = Vec2::ZERO;
        for _ in 0..attempts.max(1) {
            candidate = Vec2::new(
                rng.random_range(-range..=range),
                rng.random_range(-range..=range),
            );
            if placed.iter().all(|p| p.distance_squared(candidate) >= min_sq) {
                break;
            }
        }
        placed.push(candidate);
    }
    placed
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ZoneOccupancy>()
        .init_resource::<HazardExposure>()
        .add_systems(OnEnter(GameState::InGame), (reset, spawn_zones))
        .add_systems(FixedUpdate, (
            sense.in_set(GameLoopSet::Sense),
            hazard_damage
                .in_set(GameLoopSet::Resources)
                .before(apply_damage),
        ));
}

fn reset(
    tunables: Res<Tunables>,
    mut occupancy: ResMut<ZoneOccupancy>,
    mut exposure: ResMut<HazardExposure>,
) {
    *occupancy = ZoneOccupancy::default();
    *exposure = HazardExposure(CooldownGate::new(tunables.zones.hazard_damage_cooldown));
}

fn spawn_zones(mut commands: Commands, tunables: Res<Tunables>) {
    let tuning = &tunables.zones;
    let mut rng = match tuning.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for kind in [ZoneKind::Bush, ZoneKind::Water, ZoneKind::Hazard] {
        let footprint = kind.footprint(tuning);
        let positions = scatter(&mut rng, kind.layout(tuning), tuning.range, tuning.placement_attempts);
        debug!("Placed {} {kind:?} zones", positions.len());

        commands.spawn_batch(positions.into_iter().map(move |p| {
            (
                Name::new(format!("{kind:?}")),
                Zone { kind, footprint },
                Transform::from_xyz(p.x, 0.0, p.y),
                SessionEntity,
            )
        }));
    }
}

pub fn sense(
    q_player: Query<&Transform, With<Player>>,
    q_zones: Query<(&Zone, &Transform)>,
    mut occupancy: ResMut<ZoneOccupancy>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let now = ZoneOccupancy::of(
        q_zones.iter().map(|(z, tf)| (z, tf.translation)),
        player.translation,
    );
    occupancy.set_if_neq(now);
}

fn hazard_damage(
    time: Res<Time>,
    tunables: Res<Tunables>,
    clock: Res<SessionClock>,
    occupancy: Res<ZoneOccupancy>,
    mut exposure: ResMut<HazardExposure>,
    mut damage: MessageWriter<DamagePlayer>,
) {
    let now = time.elapsed();
    if !occupancy.in_hazard || !hazard_armed(&clock, now, tunables.zones.hazard_grace) {
        return;
    }
    if exposure.0.try_take(now) {
        damage.write(DamagePlayer { source: DamageSource::Hazard });
    }
}

#[inline]
fn hazard_armed(clock: &SessionClock, now: Duration, grace: Duration) -> bool {
    clock.is_started() && clock.since_start(now) >= grace
}
