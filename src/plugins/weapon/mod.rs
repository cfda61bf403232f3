//! Dart gun: magazine, reload and trigger handling.
//!
//! Firing only produces a `SpawnDart` message; the projectiles plugin owns the
//! dart entities. Before the SMG pickup every press fires one dart. After it,
//! holding the trigger fires on press and then every `auto_fire_interval`.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::cooldown::Deadline;
use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::audio::{Sound, SoundCue};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::{eye_position, ControlInput, LookAngles, Player};
use crate::plugins::progression::Unlocks;
use crate::plugins::projectiles::{dart_velocity, SpawnDart};
use crate::plugins::shield::{self, Shield};
use crate::plugins::zones::ZoneOccupancy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireContext {
    pub concealed: bool,
    pub in_hazard: bool,
    pub shielding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejection {
    Shielding,
    InHazard,
    Concealed,
    Reloading,
    /// The magazine was empty; a reload has just begun.
    ReloadStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired { remaining: u8 },
    Rejected(FireRejection),
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magazine {
    ammo: u8,
    capacity: u8,
    reload: Deadline,
}

impl Magazine {
    pub fn new(capacity: u8) -> Self {
        Self { ammo: capacity, capacity, reload: Deadline::default() }
    }

    #[inline]
    pub fn ammo(&self) -> u8 {
        self.ammo
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.reload.is_pending()
    }

    pub fn try_fire(&mut self, now: Duration, ctx: FireContext, reload_time: Duration) -> FireOutcome {
        use FireRejection::*;

        let rejection = if ctx.shielding {
            Some(Shielding)
        } else if ctx.in_hazard {
            Some(InHazard)
        } else if ctx.concealed {
            Some(Concealed)
        } else if self.is_reloading() {
            Some(Reloading)
        } else if self.ammo == 0 {
            self.reload.schedule(now, reload_time);
            Some(ReloadStarted)
        } else {
            None
        };

        match rejection {
            Some(r) => FireOutcome::Rejected(r),
            None => {
                self.ammo -= 1;
                FireOutcome::Fired { remaining: self.ammo }
            }
        }
    }

    /// Refill once the reload is done. Returns whether it finished this tick.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.reload.fire(now) {
            self.ammo = self.capacity;
            return true;
        }
        false
    }
}

/// Trigger state that outlives a single press.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Trigger {
    next_auto: Deadline,
    smg_looping: bool,
}

pub fn plugin(app: &mut App) {
    let capacity = app.world().resource::<Tunables>().weapon.magazine;
    app.insert_resource(Magazine::new(capacity))
        .init_resource::<Trigger>()
        .add_systems(OnEnter(GameState::InGame), reset)
        .add_systems(FixedUpdate, (
            reload.in_set(GameLoopSet::Timers),
            fire.in_set(GameLoopSet::Actions).after(shield::controls),
        ));
}

fn reset(tunables: Res<Tunables>, mut magazine: ResMut<Magazine>, mut trigger: ResMut<Trigger>) {
    *magazine = Magazine::new(tunables.weapon.magazine);
    *trigger = Trigger::default();
}

fn reload(time: Res<Time>, mut magazine: ResMut<Magazine>) {
    if magazine.tick(time.elapsed()) {
        debug!("Reloaded");
    }
}

/// Everything the trigger reads but never changes.
#[derive(SystemParam)]
pub struct FireConditions<'w> {
    time: Res<'w, Time>,
    tunables: Res<'w, Tunables>,
    occupancy: Res<'w, ZoneOccupancy>,
    shield: Res<'w, Shield>,
    unlocks: Res<'w, Unlocks>,
}

impl FireConditions<'_> {
    fn context(&self) -> FireContext {
        FireContext {
            concealed: self.occupancy.concealed,
            in_hazard: self.occupancy.in_hazard,
            shielding: self.shield.is_blocking(),
        }
    }
}

pub fn fire(
    conditions: FireConditions,
    mut input: ResMut<ControlInput>,
    mut magazine: ResMut<Magazine>,
    mut trigger: ResMut<Trigger>,
    q_player: Query<(&Transform, &LookAngles), With<Player>>,
    mut darts: MessageWriter<SpawnDart>,
    mut cues: MessageWriter<SoundCue>,
) {
    let now = conditions.time.elapsed();
    let w = &conditions.tunables.weapon;
    let smg = conditions.unlocks.smg;
    let pressed = ControlInput::take(&mut input.fire_pressed);
    let held = input.fire_held;

    let attempt = if !smg {
        pressed
    } else if pressed || (held && trigger.next_auto.fire(now)) {
        trigger.next_auto.schedule(now, w.auto_fire_interval);
        true
    } else {
        false
    };

    if !pressed && !held {
        trigger.next_auto.cancel();
        stop_smg(&mut trigger, &mut cues);
    }
    if !attempt {
        return;
    }

    let Ok((tf, look)) = q_player.single() else {
        return;
    };
    match magazine.try_fire(now, conditions.context(), w.reload) {
        FireOutcome::Fired { remaining } => {
            darts.write(SpawnDart {
                origin: eye_position(tf),
                velocity: dart_velocity(*look, w.dart_speed),
            });
            debug!("Fired, {remaining} left");

            if !smg {
                cues.write(SoundCue::Play(Sound::Shot));
            } else if !trigger.smg_looping {
                trigger.smg_looping = true;
                cues.write(SoundCue::Play(Sound::Smg));
            }
        }
        FireOutcome::Rejected(reason) => {
            debug!("Fire rejected: {reason:?}");
            if reason == FireRejection::ReloadStarted {
                cues.write(SoundCue::Play(Sound::Reload));
            }
            stop_smg(&mut trigger, &mut cues);
        }
    }
}

fn stop_smg(trigger: &mut Trigger, cues: &mut MessageWriter<SoundCue>) {
    if std::mem::take(&mut trigger.smg_looping) {
        cues.write(SoundCue::Stop(Sound::Smg));
    }
}

/// HUD label for the current weapon.
pub fn weapon_label(unlocks: &Unlocks) -> &'static str {
    if unlocks.smg { "SMG" } else { "Dart pistol" }
}
