//! Session plugin: the session clock, session-scoped entities and restart.
//!
//! A session starts on the first fixed tick after entering `InGame` and ends in
//! `GameOver` or `Victory`. The ending is latched in `SessionEnd` on the tick it
//! happens, since the state itself only changes at the next frame boundary.
//! Restarting despawns every `SessionEntity`; each rule plugin resets its own
//! resources in `OnEnter(GameState::InGame)`.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::GameLoopSet;

/// Marker: despawned when the session restarts.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SessionEntity;

/// Elapsed session time on the fixed clock.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClock {
    started_at: Option<Duration>,
    stopped_at: Option<Duration>,
}

impl SessionClock {
    pub fn start(&mut self, now: Duration) {
        self.started_at = Some(now);
        self.stopped_at = None;
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Freeze the displayed time. Later calls keep the first stop.
    pub fn stop(&mut self, now: Duration) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Time since the session started, ignoring any stop.
    pub fn since_start(&self, now: Duration) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_sub(start))
    }

    /// Time shown to the player: frozen once stopped.
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.since_start(self.stopped_at.unwrap_or(now))
    }
}

/// How the session ended. Set once; the first ending wins.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionEnd(Option<GameState>);

impl SessionEnd {
    #[inline]
    pub fn outcome(&self) -> Option<GameState> {
        self.0
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.0.is_some()
    }
}

/// Run condition for the combat loop: false from the tick the session ends.
pub fn session_live(end: Option<Res<SessionEnd>>) -> bool {
    end.is_none_or(|end| !end.is_over())
}

/// Ends the session from inside the fixed tick.
#[derive(SystemParam)]
pub struct SessionControl<'w> {
    time: Res<'w, Time>,
    end: ResMut<'w, SessionEnd>,
    clock: ResMut<'w, SessionClock>,
    next: ResMut<'w, NextState<GameState>>,
}

impl SessionControl<'_> {
    #[inline]
    pub fn is_over(&self) -> bool {
        self.end.is_over()
    }

    /// Latch `outcome`, freeze the clock and queue the state change.
    /// Returns false if the session had already ended.
    pub fn finish(&mut self, outcome: GameState) -> bool {
        if self.end.is_over() {
            return false;
        }
        self.end.0 = Some(outcome);
        self.clock.stop(self.time.elapsed());
        self.next.set(outcome);
        true
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<SessionClock>()
        .init_resource::<SessionEnd>()
        .add_systems(OnEnter(GameState::InGame), reset_session)
        .add_systems(FixedUpdate, start_clock.in_set(GameLoopSet::Timers))
        .add_systems(
            Update,
            restart_on_key.run_if(in_state(GameState::GameOver).or(in_state(GameState::Victory))),
        )
        .add_systems(OnEnter(GameState::GameOver), stop_clock)
        .add_systems(OnEnter(GameState::Victory), stop_clock);
}

fn reset_session(mut clock: ResMut<SessionClock>, mut end: ResMut<SessionEnd>) {
    *clock = SessionClock::default();
    *end = SessionEnd::default();
}

fn start_clock(time: Res<Time>, mut clock: ResMut<SessionClock>) {
    if !clock.is_started() {
        clock.start(time.elapsed());
    }
}

fn stop_clock(time: Res<Time<Fixed>>, mut clock: ResMut<SessionClock>) {
    clock.stop(time.elapsed());
}

/// Tear down the finished session and go back to `InGame`.
pub fn restart_session(
    commands: &mut Commands,
    next: &mut NextState<GameState>,
    q_session: &Query<Entity, With<SessionEntity>>,
) {
    for e in q_session {
        commands.entity(e).despawn();
    }
    next.set(GameState::InGame);
}

fn restart_on_key(
    mut commands: Commands,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut next: ResMut<NextState<GameState>>,
    q_session: Query<Entity, With<SessionEntity>>,
) {
    let Some(keys) = keys else { return; };
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    info!("Restarting session");
    restart_session(&mut commands, &mut next, &q_session);
}
