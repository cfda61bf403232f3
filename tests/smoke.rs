mod common;

use bevy::prelude::*;
use dragon_arena::common::state::GameState;
use dragon_arena::plugins::enemies::{Enemy, EnemyKind};
use dragon_arena::plugins::hud::HudReadout;
use dragon_arena::plugins::player::Player;
use dragon_arena::plugins::session::SessionClock;
use dragon_arena::plugins::zones::Zone;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();
    common::tick(&mut app, 3);
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
}

#[test]
fn session_starts_with_player_and_warrior() {
    let mut app = common::app_headless();
    common::tick(&mut app, 2);

    let players = app.world_mut().query::<&Player>().iter(app.world()).count();
    assert_eq!(players, 1);

    let kinds: Vec<EnemyKind> = app
        .world_mut()
        .query_filtered::<&EnemyKind, With<Enemy>>()
        .iter(app.world())
        .copied()
        .collect();
    assert_eq!(kinds, vec![EnemyKind::Warrior]);

    assert!(app.world().resource::<SessionClock>().is_started());
    let hud = app.world().resource::<HudReadout>();
    assert_eq!(hud.hearts, "♥♥♥");
    assert_eq!(hud.ammo, "20/∞");
}

#[test]
fn default_layout_scatters_every_zone() {
    let mut tunables = common::quiet_tunables();
    tunables.zones = Default::default();
    tunables.zones.seed = Some(11);
    let mut app = common::app_with(tunables);

    let zones = app.world_mut().query::<&Zone>().iter(app.world()).count();
    assert_eq!(zones, 50 + 25 + 9);
}
