use std::path::Path;
use std::time::Duration;

use glam::Vec3;

use crate::clip::{LoopingSound, SoundClip};
use crate::error::AudioError;
use crate::manager::AudioEngine;

/// Sounds attached to the controlled character: a one-shot jump cue and a
/// continuous sprint loop whose volume the controller drives per frame.
pub struct CharacterAudio {
    jump: SoundClip,
    sprint_loop: LoopingSound,
}

impl CharacterAudio {
    /// Load both clips and start the sprint loop silently.
    pub fn new(
        engine: &mut AudioEngine,
        jump_path: &Path,
        sprint_loop_path: &Path,
    ) -> Result<Self, AudioError> {
        let jump = engine.load_clip(jump_path)?;
        let loop_clip = engine.load_clip(sprint_loop_path)?;
        let sprint_loop = engine.play_looping(&loop_clip)?;
        Ok(Self { jump, sprint_loop })
    }

    /// Fire the jump cue, positioned at the character when given.
    pub fn play_jump(
        &mut self,
        engine: &mut AudioEngine,
        position: Option<Vec3>,
    ) -> Result<(), AudioError> {
        match position {
            Some(position) => engine.play_at(&self.jump, position),
            None => engine.play(&self.jump),
        }
    }

    /// Drive the sprint loop volume (0.0–1.0).
    pub fn set_sprint_volume(&mut self, volume: f32) {
        self.sprint_loop.set_volume(volume as f64);
    }

    /// Fade the loop out, e.g. when the character is unloaded.
    pub fn stop(&mut self) {
        self.sprint_loop.stop(Duration::from_millis(250));
    }
}
