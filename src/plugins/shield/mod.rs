//! Player shield.
//!
//! Raised on press, lowered on release or after `duration`. Every lowering
//! starts a cooldown during which it cannot be raised again. Hazard zones
//! refuse it.

use std::time::Duration;

use bevy::prelude::*;

use crate::common::cooldown::Deadline;
use crate::common::{state::GameState, tunables::{ShieldTuning, Tunables}};
use crate::plugins::audio::{Sound, SoundCue};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::ControlInput;
use crate::plugins::zones::ZoneOccupancy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldOutcome {
    Raised,
    InHazard,
    CoolingDown,
    AlreadyRaised,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shield {
    blocking: bool,
    expires: Deadline,
    cooldown: Deadline,
}

impl Shield {
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    #[inline]
    pub fn is_cooling_down(&self, now: Duration) -> bool {
        self.cooldown.is_active(now)
    }

    pub fn press(&mut self, now: Duration, in_hazard: bool, tuning: &ShieldTuning) -> ShieldOutcome {
        if in_hazard {
            return ShieldOutcome::InHazard;
        }
        if self.blocking {
            return ShieldOutcome::AlreadyRaised;
        }
        if self.is_cooling_down(now) {
            return ShieldOutcome::CoolingDown;
        }
        self.blocking = true;
        self.expires.schedule(now, tuning.duration);
        ShieldOutcome::Raised
    }

    /// Lower the shield. Returns `false` if it was not raised.
    pub fn release(&mut self, now: Duration, tuning: &ShieldTuning) -> bool {
        if !self.blocking {
            return false;
        }
        self.blocking = false;
        self.expires.cancel();
        self.cooldown.schedule(now, tuning.cooldown);
        true
    }

    /// Lower the shield once its duration ran out. Returns whether it did.
    pub fn tick(&mut self, now: Duration, tuning: &ShieldTuning) -> bool {
        if self.expires.fire(now) {
            return self.release(now, tuning);
        }
        false
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Shield>()
        .add_systems(OnEnter(GameState::InGame), reset)
        .add_systems(FixedUpdate, (
            expire.in_set(GameLoopSet::Timers),
            controls.in_set(GameLoopSet::Actions),
        ))
        .add_systems(OnExit(GameState::InGame), reset);
}

fn reset(mut shield: ResMut<Shield>) {
    *shield = Shield::default();
}

fn expire(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut shield: ResMut<Shield>,
    mut cues: MessageWriter<SoundCue>,
) {
    if shield.tick(time.elapsed(), &tunables.shield) {
        debug!("Shield expired");
        cues.write(SoundCue::Stop(Sound::ShieldHold));
    }
}

pub fn controls(
    time: Res<Time>,
    tunables: Res<Tunables>,
    occupancy: Res<ZoneOccupancy>,
    mut input: ResMut<ControlInput>,
    mut shield: ResMut<Shield>,
    mut cues: MessageWriter<SoundCue>,
) {
    let now = time.elapsed();

    if ControlInput::take(&mut input.block_pressed) {
        match shield.press(now, occupancy.in_hazard, &tunables.shield) {
            ShieldOutcome::Raised => {
                // Raising the shield also lets go of the trigger.
                input.fire_held = false;
                input.fire_pressed = false;
                cues.write(SoundCue::Play(Sound::ShieldHold));
            }
            other => debug!("Shield rejected: {other:?}"),
        }
    }

    if ControlInput::take(&mut input.block_released) && shield.release(now, &tunables.shield) {
        cues.write(SoundCue::Stop(Sound::ShieldHold));
    }
}

#[cfg(test)]
mod tests;
