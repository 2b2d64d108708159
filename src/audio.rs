//! Kira-backed sound sink for the controller

use glam::Vec3;
use stride_audio::{AudioEngine, AudioError, CharacterAudio};
use stride_game::{CameraPose, SoundCue, SoundSink};
use tracing::warn;

use crate::settings::AudioSettings;

/// Audio engine plus the character's clips
pub struct KiraSink {
    engine: AudioEngine,
    character: CharacterAudio,
}

impl KiraSink {
    /// Open the output device and load both clips
    pub fn new(settings: &AudioSettings) -> Result<Self, AudioError> {
        let mut engine = AudioEngine::new(settings.volumes.clone())?;
        let character = CharacterAudio::new(
            &mut engine,
            &settings.jump_clip,
            &settings.sprint_loop_clip,
        )?;
        Ok(Self { engine, character })
    }

    /// Follow the camera and drop finished one-shots
    pub fn end_frame(&mut self, camera: &CameraPose) {
        self.engine
            .set_listener(camera.position, camera.forward(), Vec3::Y);
        self.engine.update();
    }

    /// Fade the loop out
    pub fn stop(&mut self) {
        self.character.stop();
    }
}

impl SoundSink for KiraSink {
    fn play_one_shot(&mut self, cue: SoundCue, position: Vec3) {
        let result = match cue {
            SoundCue::Jump => self.character.play_jump(&mut self.engine, Some(position)),
        };
        if let Err(e) = result {
            warn!("Failed to play {:?}: {}", cue, e);
        }
    }

    fn set_loop_volume(&mut self, volume: f32) {
        self.character.set_sprint_volume(volume);
    }
}
