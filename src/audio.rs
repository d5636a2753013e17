//! Audio cues
//!
//! The host mixes and plays the sounds; this module decides which cue plays,
//! where, and how loud.

use serde::{Deserialize, Serialize};

use crate::platform::{AudioCuePlayer, NodeId};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball lands in a cup
    BallSunk,
}

impl SoundEffect {
    /// Asset path of the sound file
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::BallSunk => "art.scnassets/sunk.wav",
        }
    }

    pub const ALL: [SoundEffect; 1] = [SoundEffect::BallSunk];
}

/// Audio manager for the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Cues the host reported as loaded
    loaded: Vec<SoundEffect>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            loaded: Vec::new(),
        }
    }

    /// Ask the host to load every cue up front
    pub fn preload(&mut self, player: &mut impl AudioCuePlayer) {
        for effect in SoundEffect::ALL {
            if self.loaded.contains(&effect) {
                continue;
            }
            if player.preload(effect) {
                self.loaded.push(effect);
            } else {
                log::warn!("Failed to load {} - cue disabled", effect.asset_path());
            }
        }
    }

    pub fn is_loaded(&self, effect: SoundEffect) -> bool {
        self.loaded.contains(&effect)
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

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

    /// Play a cue attached to a node. Returns true if the host was asked to play it.
    pub fn play(&self, player: &mut impl AudioCuePlayer, node: NodeId, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 || !self.is_loaded(effect) {
            return false;
        }
        player.play_cue(node, effect, vol);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessHost, SceneGraph};

    #[test]
    fn test_play_requires_preload() {
        let mut host = HeadlessHost::new();
        let mut audio = AudioManager::default();
        let node = host.root();

        assert!(!audio.play(&mut host, node, SoundEffect::BallSunk));
        audio.preload(&mut host);
        assert!(audio.play(&mut host, node, SoundEffect::BallSunk));
        assert_eq!(host.played_cues().len(), 1);
    }

    #[test]
    fn test_missing_sound_disables_cue() {
        let mut host = HeadlessHost::new();
        host.set_sound_available(SoundEffect::BallSunk, false);
        let mut audio = AudioManager::default();
        audio.preload(&mut host);
        assert!(!audio.is_loaded(SoundEffect::BallSunk));
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut host = HeadlessHost::new();
        let mut audio = AudioManager::default();
        audio.preload(&mut host);
        audio.set_muted(true);
        let node = host.root();
        assert!(!audio.play(&mut host, node, SoundEffect::BallSunk));
        assert!(host.played_cues().is_empty());
    }

    #[test]
    fn test_volume_is_product() {
        let mut host = HeadlessHost::new();
        let mut audio = AudioManager::default();
        audio.preload(&mut host);
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        let node = host.root();
        audio.play(&mut host, node, SoundEffect::BallSunk);
        let (_, _, vol) = host.played_cues()[0];
        assert!((vol - 0.5).abs() < 1e-6);
    }
}
