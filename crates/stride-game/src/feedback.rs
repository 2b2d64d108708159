//! Animation and audio feedback

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_core::ease_toward;

use crate::controller::ControllerState;
use crate::rig::CharacterRig;

/// One-shot sounds the controller can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A jump was committed
    Jump,
}

/// Audio output as seen by the controller
pub trait SoundSink {
    /// Play a cue once from a world position
    fn play_one_shot(&mut self, cue: SoundCue, position: Vec3);

    /// Volume of the continuous sprint loop (0.0-1.0)
    fn set_loop_volume(&mut self, volume: f32);
}

/// Feedback tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Clip played while standing still
    pub idle_clip: String,
    /// Clip played while moving
    pub move_clip: String,
    /// Animation rate while walking
    pub walk_rate: f32,
    /// Animation rate while sprinting
    pub sprint_rate: f32,
    /// Sprint loop volume while sprinting
    pub sprint_volume: f32,
    /// Loop volume blend rate per 60 Hz frame (0-1)
    pub volume_blend: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            idle_clip: "Idle".into(),
            move_clip: "Run".into(),
            walk_rate: 1.0,
            sprint_rate: 2.0,
            sprint_volume: 0.6,
            volume_blend: 0.05,
        }
    }
}

/// Maps controller state onto the rig's animation and the sound sink.
///
/// Rig calls are only made on change; the loop volume is pushed every frame.
#[derive(Debug, Clone)]
pub struct FeedbackBinder {
    /// Configuration
    pub config: FeedbackConfig,
    playback_rate: Option<f32>,
    moving_clip: Option<bool>,
    loop_volume: f32,
}

impl FeedbackBinder {
    /// Create a binder that has not touched the rig yet
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            playback_rate: None,
            moving_clip: None,
            loop_volume: 0.0,
        }
    }

    /// Current eased sprint loop volume
    pub fn loop_volume(&self) -> f32 {
        self.loop_volume
    }

    /// Forget what was applied, e.g. when a new rig is attached
    pub fn reset(&mut self) {
        self.playback_rate = None;
        self.moving_clip = None;
        self.loop_volume = 0.0;
    }

    /// Push this frame's feedback
    pub fn update(
        &mut self,
        state: &ControllerState,
        jumped: bool,
        rig: &mut dyn CharacterRig,
        sound: Option<&mut dyn SoundSink>,
        dt: f32,
    ) {
        let rate = if state.is_sprinting {
            self.config.sprint_rate
        } else {
            self.config.walk_rate
        };
        if self.playback_rate != Some(rate) {
            rig.set_playback_rate(rate);
            self.playback_rate = Some(rate);
        }

        if self.moving_clip != Some(state.is_moving) {
            let (start, stop) = if state.is_moving {
                (&self.config.move_clip, &self.config.idle_clip)
            } else {
                (&self.config.idle_clip, &self.config.move_clip)
            };
            if self.moving_clip.is_some() {
                rig.stop_clip(stop);
            }
            rig.play_clip(start);
            self.moving_clip = Some(state.is_moving);
        }

        let target = if state.is_sprinting {
            self.config.sprint_volume
        } else {
            0.0
        };
        self.loop_volume = ease_toward(self.loop_volume, target, self.config.volume_blend, dt);

        if let Some(sound) = sound {
            sound.set_loop_volume(self.loop_volume);
            if jumped {
                sound.play_one_shot(SoundCue::Jump, state.position);
            }
        }
    }
}

impl Default for FeedbackBinder {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}
