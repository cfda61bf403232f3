//! Drops, pickups and the two-stage progression.
//!
//! ```text
//! Warrior defeated -> Potion + SMG dropped
//! both picked up   -> stage two (once): heal unlocked, cap raised, banner,
//!                     Warrior bar hidden, Dragon spawned with a strike grace
//! Dragon defeated  -> Artifact dropped
//! Artifact picked  -> Victory, session clock frozen
//! ```

use bevy::prelude::*;

use crate::common::cooldown::Deadline;
use crate::common::spatial::within_radius;
use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::core::GameLoopSet;
use crate::plugins::enemies::{spawn_enemy, EnemyKind};
use crate::plugins::player::{eye_position, Player};
use crate::plugins::projectiles::EnemyDefeated;
use crate::plugins::session::{SessionControl, SessionEntity};
use crate::plugins::vitals::{HealCharge, PlayerVitals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Potion,
    Smg,
    Artifact,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedItem {
    pub kind: ItemKind,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unlocks {
    pub potion: bool,
    pub smg: bool,
    pub artifact: bool,
}

impl Unlocks {
    pub fn grant(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Potion => self.potion = true,
            ItemKind::Smg => self.smg = true,
            ItemKind::Artifact => self.artifact = true,
        }
    }

    #[inline]
    pub fn stage_two_ready(&self) -> bool {
        self.potion && self.smg
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progression {
    pub stage_two: bool,
    pub dragon_spawned: bool,
    /// Dragon strikes are withheld while this is active.
    pub dragon_grace: Deadline,
    pub banner: Deadline,
    pub warrior_bar_hidden: bool,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Unlocks>()
        .init_resource::<Progression>()
        .add_systems(OnEnter(GameState::InGame), reset)
        .add_systems(FixedUpdate, (
            expire_banner.in_set(GameLoopSet::Timers),
            (spawn_drops, collect_items, advance_stage, claim_victory)
                .chain()
                .in_set(GameLoopSet::Progression),
        ));
}

fn reset(mut unlocks: ResMut<Unlocks>, mut progression: ResMut<Progression>) {
    *unlocks = Unlocks::default();
    *progression = Progression::default();
}

fn expire_banner(time: Res<Time>, mut progression: ResMut<Progression>) {
    if progression.banner.fire(time.elapsed()) {
        debug!("Stage banner removed");
    }
}

/// Items dropped by an enemy of `kind` dying at `at`.
pub fn drops_for(kind: EnemyKind, at: Vec3, tunables: &Tunables) -> Vec<(ItemKind, Vec3)> {
    let p = &tunables.progression;
    let base = at.with_y(p.drop_height);
    match kind {
        EnemyKind::Warrior => vec![
            (ItemKind::Potion, base),
            (ItemKind::Smg, base + p.secondary_drop_offset),
        ],
        EnemyKind::Dragon => vec![(ItemKind::Artifact, base)],
    }
}

pub fn spawn_drops(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut defeated: MessageReader<EnemyDefeated>,
) {
    for d in defeated.read() {
        for (kind, at) in drops_for(d.kind, d.position, &tunables) {
            commands.spawn((
                Name::new(format!("{kind:?}")),
                DroppedItem { kind },
                Transform::from_translation(at),
                SessionEntity,
            ));
        }
    }
}

pub fn collect_items(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut unlocks: ResMut<Unlocks>,
    q_player: Query<&Transform, (With<Player>, Without<DroppedItem>)>,
    q_items: Query<(Entity, &DroppedItem, &Transform)>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let eye = eye_position(player);

    for (e, item, tf) in &q_items {
        if within_radius(eye, tf.translation, tunables.progression.pickup_radius) {
            info!("Picked up {:?}", item.kind);
            unlocks.grant(item.kind);
            commands.entity(e).despawn();
        }
    }
}

pub fn advance_stage(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    unlocks: Res<Unlocks>,
    mut progression: ResMut<Progression>,
    mut vitals: ResMut<PlayerVitals>,
    mut heal: ResMut<HealCharge>,
) {
    if progression.stage_two || !unlocks.stage_two_ready() {
        return;
    }
    let now = time.elapsed();
    let p = &tunables.progression;
    info!("Stage two");

    progression.stage_two = true;
    progression.dragon_grace.schedule(now, p.dragon_grace);
    progression.banner.schedule(now, p.banner);
    progression.warrior_bar_hidden = true;
    heal.enabled = true;
    vitals.raise_cap(tunables.player.bonus_max_health);

    if !progression.dragon_spawned {
        progression.dragon_spawned = true;
        spawn_enemy(&mut commands, EnemyKind::Dragon, &tunables);
    }
}

pub fn claim_victory(
    unlocks: Res<Unlocks>,
    vitals: Res<PlayerVitals>,
    mut session: SessionControl,
) {
    if !unlocks.artifact || vitals.is_dead() {
        return;
    }
    if session.finish(GameState::Victory) {
        info!("Artifact recovered");
    }
}
