//! Stride Game - Third-person character controller
//!
//! Turns keyboard, pointer and touch input into collision-aware character
//! motion, an orbiting camera pose, and animation/audio feedback, once per
//! rendered frame.

pub mod camera;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod input;
pub mod rig;

pub use camera::{CameraConfig, CameraPose, CameraRig};
pub use controller::{
    CharacterController, ControllerConfig, ControllerState, DynamicsIntegrator, FrameReport,
    GroundContact, JumpStateMachine, KinematicIntegrator, MotionIntegrator, MotionStrategy,
    RespawnCause,
};
pub use error::ControllerError;
pub use feedback::{FeedbackBinder, FeedbackConfig, SoundCue, SoundSink};
pub use input::{InputAggregator, InputConfig, Intent, IntentSource, KeyBindings};
pub use rig::CharacterRig;
