//! Stride Audio - Clip playback for the character controller using kira
//!
//! Provides clip loading, one-shot and looping playback, and listener-relative
//! attenuation for positioned sounds.

mod character;
mod clip;
mod config;
mod error;
mod manager;
mod spatial;

pub use character::CharacterAudio;
pub use clip::{LoopingSound, SoundClip};
pub use config::AudioConfig;
pub use error::AudioError;
pub use manager::AudioEngine;
pub use spatial::{compute_spatial, Listener, SpatialParams};
