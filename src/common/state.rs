//! Global state machine.
//!
//! The gameplay loop only runs in `InGame`; both terminal states freeze it.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
    Victory,
}
