//! Audio cues.
//!
//! Rules never touch audio assets: they write `SoundCue` messages. The full app
//! adds `playback_plugin`, which turns cues into `AudioPlayer` entities and keeps
//! track of the looping ones so they can be stopped.
//!
//! Clips live under `assets/audio/` and are not part of the repository. A
//! missing clip is skipped at startup and its cues stay silent.

use std::path::Path;

use bevy::asset::io::file::FileAssetReader;
use bevy::audio::{AudioPlayer, PlaybackSettings};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::core::GameLoopSet;
use crate::plugins::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Shot,
    Smg,
    Reload,
    Hit,
    Footstep,
    ShieldHold,
    Heal,
}

impl Sound {
    pub const ALL: [Sound; 7] = [
        Sound::Shot,
        Sound::Smg,
        Sound::Reload,
        Sound::Hit,
        Sound::Footstep,
        Sound::ShieldHold,
        Sound::Heal,
    ];

    pub fn looping(self) -> bool {
        matches!(self, Sound::Smg | Sound::Footstep | Sound::ShieldHold)
    }

    fn path(self) -> &'static str {
        match self {
            Sound::Shot => "audio/shot.ogg",
            Sound::Smg => "audio/smg.ogg",
            Sound::Reload => "audio/reload.ogg",
            Sound::Hit => "audio/hit.ogg",
            Sound::Footstep => "audio/footstep.ogg",
            Sound::ShieldHold => "audio/shield.ogg",
            Sound::Heal => "audio/heal.ogg",
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Play(Sound),
    Stop(Sound),
}

/// Footstep loop state: last sampled player position and whether it plays.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FootstepTracker {
    last: Option<Vec3>,
    playing: bool,
}

impl FootstepTracker {
    /// Feed this tick's position. Returns the cue to send, if the loop changes.
    pub fn sample(&mut self, position: Option<Vec3>, threshold: f32) -> Option<SoundCue> {
        let moved = match (self.last, position) {
            (Some(a), Some(b)) => a.distance(b) > threshold,
            _ => false,
        };
        self.last = position;

        match (moved, self.playing) {
            (true, false) => {
                self.playing = true;
                Some(SoundCue::Play(Sound::Footstep))
            }
            (false, true) => {
                self.playing = false;
                Some(SoundCue::Stop(Sound::Footstep))
            }
            _ => None,
        }
    }
}

/// Gameplay side: the message queue and footstep detection.
pub fn plugin(app: &mut App) {
    app.add_message::<SoundCue>()
        .init_resource::<FootstepTracker>()
        .add_systems(OnEnter(GameState::InGame), reset_footsteps)
        .add_systems(FixedUpdate, footsteps.in_set(GameLoopSet::Presentation));
}

fn reset_footsteps(mut tracker: ResMut<FootstepTracker>) {
    *tracker = FootstepTracker::default();
}

pub fn footsteps(
    tunables: Res<Tunables>,
    state: Res<State<GameState>>,
    mut tracker: ResMut<FootstepTracker>,
    q_player: Query<&Transform, With<Player>>,
    mut cues: MessageWriter<SoundCue>,
) {
    // Outside the game the player counts as standing still.
    let position = match state.get() {
        GameState::InGame => q_player.single().ok().map(|tf| tf.translation),
        _ => None,
    };
    if let Some(cue) = tracker.sample(position, tunables.player.footstep_threshold) {
        cues.write(cue);
    }
}

#[derive(Resource)]
struct SoundLibrary(HashMap<Sound, Handle<AudioSource>>);

/// Loops currently playing, by sound.
#[derive(Resource, Default)]
struct ActiveLoops(HashMap<Sound, Entity>);

/// Render side: load the clips and play cues.
pub fn playback_plugin(app: &mut App) {
    app.init_resource::<ActiveLoops>()
        .add_systems(Startup, load_sounds)
        .add_systems(Update, play_cues)
        .add_systems(OnExit(GameState::InGame), stop_loops);
}

/// Sounds whose clip file exists under `root`.
fn available_sounds(root: &Path) -> Vec<Sound> {
    Sound::ALL
        .into_iter()
        .filter(|s| {
            let found = root.join(s.path()).is_file();
            if !found {
                warn!("No clip at {}, {s:?} cues stay silent", s.path());
            }
            found
        })
        .collect()
}

fn load_sounds(mut commands: Commands, assets: Res<AssetServer>) {
    let root = FileAssetReader::get_base_path().join("assets");
    let clips = available_sounds(&root)
        .into_iter()
        .map(|s| (s, assets.load(s.path())))
        .collect();
    commands.insert_resource(SoundLibrary(clips));
}

fn play_cues(
    mut commands: Commands,
    mut cues: MessageReader<SoundCue>,
    library: Res<SoundLibrary>,
    mut loops: ResMut<ActiveLoops>,
) {
    for cue in cues.read() {
        match *cue {
            SoundCue::Play(sound) => {
                let Some(clip) = library.0.get(&sound) else { continue; };
                if !sound.looping() {
                    commands.spawn((AudioPlayer::new(clip.clone()), PlaybackSettings::DESPAWN));
                    continue;
                }
                if loops.0.contains_key(&sound) {
                    continue;
                }
                let e = commands
                    .spawn((AudioPlayer::new(clip.clone()), PlaybackSettings::LOOP))
                    .id();
                loops.0.insert(sound, e);
            }
            SoundCue::Stop(sound) => {
                if let Some(e) = loops.0.remove(&sound) {
                    commands.entity(e).despawn();
                }
            }
        }
    }
}

fn stop_loops(mut commands: Commands, mut loops: ResMut<ActiveLoops>) {
    for (_, e) in loops.0.drain() {
        commands.entity(e).despawn();
    }
}
