use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundHandle, StaticSoundSettings};
use kira::sound::PlaybackState;
use tracing::{debug, info};

use crate::clip::{LoopingSound, SoundClip};
use crate::config::AudioConfig;
use crate::error::AudioError;
use crate::spatial::{self, Listener, SpatialParams};

/// The audio engine. Wraps kira's AudioManager with a clip cache and
/// one-shot / looping playback.
pub struct AudioEngine {
    manager: AudioManager<DefaultBackend>,
    clips: HashMap<PathBuf, SoundClip>,
    active: Vec<StaticSoundHandle>,
    config: AudioConfig,
    listener: Listener,
}

impl AudioEngine {
    /// Create a new AudioEngine with the given config.
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::InitFailed(e.to_string()))?;

        info!("Audio engine initialized");

        Ok(Self {
            manager,
            clips: HashMap::new(),
            active: Vec::new(),
            config,
            listener: Listener::default(),
        })
    }

    /// Load a clip by path. Repeated loads of the same path hit the cache.
    pub fn load_clip(&mut self, path: &Path) -> Result<SoundClip, AudioError> {
        if let Some(clip) = self.clips.get(path) {
            return Ok(clip.clone());
        }
        let clip = SoundClip::load(path)?;
        debug!(path = %path.display(), "Loaded audio clip");
        self.clips.insert(path.to_path_buf(), clip.clone());
        Ok(clip)
    }

    /// Play a clip once at the configured effect volume.
    pub fn play(&mut self, clip: &SoundClip) -> Result<(), AudioError> {
        let settings = StaticSoundSettings::new().volume(self.config.effective_sfx_volume());
        self.start(clip, settings)
    }

    /// Play a clip once from a world position relative to the listener.
    pub fn play_at(&mut self, clip: &SoundClip, position: Vec3) -> Result<(), AudioError> {
        let params: SpatialParams = spatial::compute_spatial(&self.listener, position);
        if params.volume <= 0.0 {
            return Ok(());
        }
        let settings = StaticSoundSettings::new()
            .volume(self.config.effective_sfx_volume() * params.volume)
            .panning(params.kira_panning());
        self.start(clip, settings)
    }

    /// Start a clip looping at zero volume; the caller drives the volume.
    pub fn play_looping(&mut self, clip: &SoundClip) -> Result<LoopingSound, AudioError> {
        let settings = StaticSoundSettings::new().volume(0.0).loop_region(..);
        let handle = self
            .manager
            .play(clip.data.clone().with_settings(settings))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        Ok(LoopingSound::new(handle, self.config.effective_loop_volume()))
    }

    /// Update the listener pose used for positioned sounds.
    pub fn set_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        self.listener.position = position;
        self.listener.forward = forward;
        self.listener.up = up;
    }

    /// Call each frame to drop handles of finished one-shots.
    pub fn update(&mut self) {
        self.active.retain(|h| h.state() != PlaybackState::Stopped);
    }

    fn start(&mut self, clip: &SoundClip, settings: StaticSoundSettings) -> Result<(), AudioError> {
        let handle = self
            .manager
            .play(clip.data.clone().with_settings(settings))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        self.active.push(handle);
        Ok(())
    }
}
