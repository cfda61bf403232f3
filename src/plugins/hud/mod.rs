//! HUD: a plain-data read-out of the session, and the text nodes that show it.
//!
//! `HudReadout` is rebuilt every fixed tick in `GameLoopSet::Presentation`
//! (which keeps running after the game ends). The render side only copies it
//! into UI text, so everything shown on screen is testable headless.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::GameLoopSet;
use crate::plugins::enemies::{Enemy, EnemyKind, Health};
use crate::plugins::progression::{Progression, Unlocks};
use crate::plugins::session::SessionClock;
use crate::plugins::shield::Shield;
use crate::plugins::vitals::{HealCharge, PlayerVitals};
use crate::plugins::weapon::{weapon_label, Magazine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Defeat,
    Victory,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudReadout {
    pub hearts: String,
    /// Health bar of the enemy currently shown, if any.
    pub enemy_bar: Option<(EnemyKind, String)>,
    pub ammo: String,
    pub weapon: &'static str,
    pub clock: String,
    pub clock_frozen: bool,
    pub banner: Option<&'static str>,
    pub shield_up: bool,
    pub heal_ready: bool,
    pub outcome: Option<Outcome>,
}

/// `mm:ss`, minutes not wrapped.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn health_bar(hp: i32) -> String {
    "█".repeat(hp.max(0) as usize)
}

pub fn plugin(app: &mut App) {
    app.init_resource::<HudReadout>()
        .add_systems(FixedUpdate, update_readout.in_set(GameLoopSet::Presentation));
}

/// The player's own resources, as the HUD sees them.
#[derive(SystemParam)]
pub struct PlayerStatus<'w> {
    vitals: Res<'w, PlayerVitals>,
    heal: Res<'w, HealCharge>,
    magazine: Res<'w, Magazine>,
    shield: Res<'w, Shield>,
    unlocks: Res<'w, Unlocks>,
}

pub fn update_readout(
    time: Res<Time>,
    state: Res<State<GameState>>,
    clock: Res<SessionClock>,
    player: PlayerStatus,
    progression: Res<Progression>,
    q_enemies: Query<(&EnemyKind, &Health), With<Enemy>>,
    mut hud: ResMut<HudReadout>,
) {
    let shown = |kind: EnemyKind| match kind {
        EnemyKind::Warrior => !progression.warrior_bar_hidden,
        EnemyKind::Dragon => progression.dragon_spawned,
    };
    let enemy_bar = q_enemies
        .iter()
        .filter(|(k, _)| shown(**k))
        .max_by_key(|(k, _)| **k == EnemyKind::Dragon)
        .map(|(k, h)| (*k, health_bar(h.hp)));

    let outcome = match state.get() {
        GameState::InGame => None,
        GameState::GameOver => Some(Outcome::Defeat),
        GameState::Victory => Some(Outcome::Victory),
    };

    let next = HudReadout {
        hearts: "♥".repeat(player.vitals.health as usize),
        enemy_bar,
        ammo: if player.magazine.is_reloading() {
            "Reloading".to_owned()
        } else {
            format!("{}/∞", player.magazine.ammo())
        },
        weapon: weapon_label(&player.unlocks),
        clock: format_clock(clock.elapsed(time.elapsed())),
        clock_frozen: clock.is_stopped(),
        banner: progression.banner.is_pending().then_some("Level 2"),
        shield_up: player.shield.is_blocking(),
        heal_ready: player.heal.is_available(),
        outcome,
    };
    hud.set_if_neq(next);
}

// ------------------------------------------------------------------------------------------------
// Render side
// ------------------------------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum HudField {
    Status,
    Enemy,
    Clock,
    Banner,
    Outcome,
}

pub fn render_plugin(app: &mut App) {
    app.add_systems(Startup, spawn_hud)
        .add_systems(Update, show_readout);
}

fn spawn_hud(mut commands: Commands) {
    let mut text = |field: HudField, node: Node, size: f32| {
        commands.spawn((
            Name::new(format!("Hud{field:?}")),
            field,
            Text::new(""),
            TextFont { font_size: size, ..default() },
            TextColor(Color::WHITE),
            node,
        ));
    };

    let corner = |top: Val, left: Val| Node {
        position_type: PositionType::Absolute,
        top,
        left,
        ..default()
    };

    text(HudField::Status, corner(Val::Px(12.0), Val::Px(12.0)), 22.0);
    text(HudField::Enemy, corner(Val::Px(12.0), Val::Percent(40.0)), 22.0);
    text(HudField::Clock, Node {
        position_type: PositionType::Absolute,
        top: Val::Px(12.0),
        right: Val::Px(12.0),
        ..default()
    }, 26.0);
    text(HudField::Banner, corner(Val::Percent(30.0), Val::Percent(44.0)), 48.0);
    text(HudField::Outcome, corner(Val::Percent(45.0), Val::Percent(32.0)), 40.0);
}

fn show_readout(
    hud: Res<HudReadout>,
    mut q_text: Query<(&HudField, &mut Text, &mut TextColor)>,
) {
    if !hud.is_changed() {
        return;
    }

    for (field, mut text, mut color) in &mut q_text {
        let value = match field {
            HudField::Status => {
                let mut s = format!("{}   {}   {}", hud.hearts, hud.weapon, hud.ammo);
                if hud.shield_up {
                    s.push_str("   [SHIELD]");
                }
                if hud.heal_ready {
                    s.push_str("   [E] heal");
                }
                s
            }
            HudField::Enemy => hud
                .enemy_bar
                .as_ref()
                .map(|(kind, bar)| format!("{kind:?} {bar}"))
                .unwrap_or_default(),
            HudField::Clock => {
                color.0 = if hud.clock_frozen {
                    Color::srgb(0.95, 0.2, 0.2)
                } else {
                    Color::WHITE
                };
                hud.clock.clone()
            }
            HudField::Banner => hud.banner.unwrap_or_default().to_owned(),
            HudField::Outcome => match hud.outcome {
                Some(Outcome::Defeat) => "You died. Press R to restart".to_owned(),
                Some(Outcome::Victory) => "Artifact recovered! Press R to play again".to_owned(),
                None => String::new(),
            },
        };
        text.0 = value;
    }
}
