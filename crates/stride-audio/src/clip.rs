use std::path::{Path, PathBuf};
use std::time::Duration;

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::tween::Tween;

use crate::error::AudioError;

/// Decoded audio data, cheap to clone and replay.
#[derive(Clone)]
pub struct SoundClip {
    path: PathBuf,
    pub(crate) data: StaticSoundData,
}

impl SoundClip {
    /// Decode a clip from disk.
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let data = StaticSoundData::from_file(path)
            .map_err(|e| AudioError::LoadFailed(path.to_path_buf(), e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }
}

impl std::fmt::Debug for SoundClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundClip").field("path", &self.path).finish()
    }
}

/// A playing looped sound whose volume is driven every frame.
pub struct LoopingSound {
    handle: StaticSoundHandle,
    volume: f64,
    gain: f64,
}

impl LoopingSound {
    pub(crate) fn new(handle: StaticSoundHandle, gain: f64) -> Self {
        Self {
            handle,
            volume: 0.0,
            gain,
        }
    }

    /// Set the loop's volume (0.0–1.0 before the configured gain).
    pub fn set_volume(&mut self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        if (volume - self.volume).abs() < f64::EPSILON {
            return;
        }
        self.volume = volume;
        self.handle.set_volume(volume * self.gain, Tween::default());
    }

    /// Stop with a fade-out.
    pub fn stop(&mut self, fade_out: Duration) {
        self.handle.stop(Tween {
            duration: fade_out,
            ..Default::default()
        });
    }
}
