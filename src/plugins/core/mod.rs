//! Core plugin: shared resources, global settings and the tick order.
//!
//! The whole combat loop runs inside `FixedUpdate` as a chain of system sets.
//! Every rule module places its systems in one of these sets, so the per-tick
//! order is fixed in one place:
//!
//! ```text
//! Timers → Sense → Actions → Projectiles → Enemies → Progression → Resources → Presentation
//! ```
//!
//! The first seven sets only run while `GameState::InGame` and the session has
//! not ended. A state change waits for the frame boundary, so the `SessionEnd`
//! latch is what stops any remaining fixed ticks of the frame. `Presentation`
//! keeps running so the HUD can show the final state.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::session::session_live;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameLoopSet {
    /// Expire stored deadlines (reload, shield, grace windows).
    Timers,
    /// Derive per-tick facts about the player (zone occupancy).
    Sense,
    /// Consume control input: shield, heal, fire.
    Actions,
    /// Advance darts, resolve hits and enemy deaths.
    Projectiles,
    /// Enemy state machines.
    Enemies,
    /// Drops, pickups, stage transition, victory.
    Progression,
    /// Environmental damage, then drain queued damage.
    Resources,
    /// HUD read-out, footsteps.
    Presentation,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    let hz = app.world().resource::<Tunables>().tick_hz;

    app.insert_resource(Time::<Fixed>::from_hz(hz));
    app.insert_resource(ClearColor(Color::srgb(0.55, 0.72, 0.9)));

    app.configure_sets(
        FixedUpdate,
        (
            GameLoopSet::Timers,
            GameLoopSet::Sense,
            GameLoopSet::Actions,
            GameLoopSet::Projectiles,
            GameLoopSet::Enemies,
            GameLoopSet::Progression,
            GameLoopSet::Resources,
        )
            .chain()
            .run_if(in_state(GameState::InGame).and(session_live)),
    );
    app.configure_sets(
        FixedUpdate,
        GameLoopSet::Presentation.after(GameLoopSet::Resources),
    );
}
