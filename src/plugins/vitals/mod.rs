//! Player health, incoming damage and the one-shot heal.
//!
//! Every damage source (enemy strikes, hazard zones) writes a `DamagePlayer`
//! message. They are drained once per tick in `GameLoopSet::Resources`, after
//! all producers have run, so a blocked or lethal hit is decided in one place.
//! Hits queued after the session has ended are dropped.

use bevy::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::audio::{Sound, SoundCue};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::ControlInput;
use crate::plugins::session::SessionControl;
use crate::plugins::shield::Shield;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Warrior,
    Dragon,
    Hazard,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamagePlayer {
    pub source: DamageSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Blocked,
    /// Already at zero: nothing left to take.
    Ignored,
    Hit { remaining: u8 },
    Killed,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerVitals {
    pub health: u8,
    pub max_health: u8,
}

impl PlayerVitals {
    pub fn new(health: u8) -> Self {
        Self { health, max_health: health }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn take_hit(&mut self, blocking: bool) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        if blocking {
            return DamageOutcome::Blocked;
        }
        self.health -= 1;
        match self.health {
            0 => DamageOutcome::Killed,
            remaining => DamageOutcome::Hit { remaining },
        }
    }

    /// Raise the cap (stage two). Current health is left as is.
    pub fn raise_cap(&mut self, max_health: u8) {
        self.max_health = self.max_health.max(max_health);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealOutcome {
    Healed { health: u8 },
    Locked,
    Spent,
    /// At the cap: the charge is kept.
    AtCap,
}

/// Single-use heal, unlocked at stage two.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealCharge {
    pub enabled: bool,
    pub used: bool,
}

impl HealCharge {
    pub fn apply(&mut self, vitals: &mut PlayerVitals) -> HealOutcome {
        if !self.enabled {
            return HealOutcome::Locked;
        }
        if self.used {
            return HealOutcome::Spent;
        }
        if vitals.health >= vitals.max_health {
            return HealOutcome::AtCap;
        }
        self.used = true;
        vitals.health += 1;
        HealOutcome::Healed { health: vitals.health }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.enabled && !self.used
    }
}

pub fn plugin(app: &mut App) {
    let start = app.world().resource::<Tunables>().player.start_health;
    app.insert_resource(PlayerVitals::new(start))
        .init_resource::<HealCharge>()
        .add_message::<DamagePlayer>()
        .add_systems(OnEnter(GameState::InGame), reset)
        .add_systems(FixedUpdate, (
            heal.in_set(GameLoopSet::Actions),
            apply_damage.in_set(GameLoopSet::Resources),
        ));
}

fn reset(tunables: Res<Tunables>, mut vitals: ResMut<PlayerVitals>, mut charge: ResMut<HealCharge>) {
    *vitals = PlayerVitals::new(tunables.player.start_health);
    *charge = HealCharge::default();
}

pub fn heal(
    mut controls: ResMut<ControlInput>,
    mut charge: ResMut<HealCharge>,
    mut vitals: ResMut<PlayerVitals>,
    mut cues: MessageWriter<SoundCue>,
) {
    if !ControlInput::take(&mut controls.heal_pressed) {
        return;
    }
    match charge.apply(&mut vitals) {
        HealOutcome::Healed { health } => {
            info!("Healed to {health}");
            cues.write(SoundCue::Play(Sound::Heal));
        }
        other => debug!("Heal rejected: {other:?}"),
    }
}

pub fn apply_damage(
    mut hits: MessageReader<DamagePlayer>,
    shield: Res<Shield>,
    mut vitals: ResMut<PlayerVitals>,
    mut session: SessionControl,
    mut cues: MessageWriter<SoundCue>,
) {
    if session.is_over() {
        hits.clear();
        return;
    }
    for hit in hits.read() {
        match vitals.take_hit(shield.is_blocking()) {
            DamageOutcome::Hit { remaining } => {
                debug!("{:?} hit the player, {remaining} left", hit.source);
                cues.write(SoundCue::Play(Sound::Hit));
            }
            DamageOutcome::Killed => {
                info!("Player killed by {:?}", hit.source);
                cues.write(SoundCue::Play(Sound::Hit));
                session.finish(GameState::GameOver);
            }
            DamageOutcome::Blocked => debug!("Shield blocked {:?}", hit.source),
            DamageOutcome::Ignored => {}
        }
    }
}
