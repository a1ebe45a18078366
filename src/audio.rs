//! Sound effect routing
//!
//! The core does not mix or play audio. [`AudioRouter`] listens to game
//! events and asks the host's [`SoundSink`] to play the matching effect at
//! the right volume.

use crate::session::EventSink;
use crate::settings::Settings;
use crate::sim::pickups::PickupKind;
use crate::sim::portal::Orientation;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player lost a life
    Hit,
    /// Shield absorbed a hit
    ShieldBreak,
    /// Splitter broke apart
    Split,
    /// Pickup collected
    Pickup,
    /// Field flipped through a portal
    PortalEnter,
    GameOver,
}

impl SoundEffect {
    /// Mix level before master/sfx volume
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::Hit => 0.5,
            SoundEffect::ShieldBreak => 0.3,
            SoundEffect::Split => 0.2,
            SoundEffect::Pickup => 0.6,
            SoundEffect::PortalEnter => 0.5,
            SoundEffect::GameOver => 0.7,
        }
    }
}

/// Host audio backend
pub trait SoundSink {
    /// `volume` is already scaled, in (0, 1]
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Background music level changed (master * music)
    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Maps game events to sound effects
#[derive(Debug, Clone)]
pub struct AudioRouter<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioRouter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.4,
            muted: false,
        }
    }

    /// Router with the volumes from `settings`
    pub fn with_settings(sink: S, settings: &Settings) -> Self {
        let mut router = Self::new(sink);
        router.apply_settings(settings);
        router
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(!settings.sfx_enabled);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.sink.set_music_volume(self.music_gain());
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.sink.set_music_volume(self.music_gain());
    }

    /// Music level handed to the host; the sfx toggle does not silence it
    pub fn music_gain(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect (silently dropped when inaudible)
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = effect.base_gain() * self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: SoundSink> EventSink for AudioRouter<S> {
    fn on_hit(&mut self, absorbed: bool) {
        self.play(if absorbed {
            SoundEffect::ShieldBreak
        } else {
            SoundEffect::Hit
        });
    }

    fn on_split(&mut self) {
        self.play(SoundEffect::Split);
    }

    fn on_pickup(&mut self, _kind: PickupKind) {
        self.play(SoundEffect::Pickup);
    }

    fn on_portal_enter(&mut self, _orientation: Orientation) {
        self.play(SoundEffect::PortalEnter);
    }

    fn on_game_over(&mut self, _final_score: u64) {
        self.play(SoundEffect::GameOver);
    }
}
