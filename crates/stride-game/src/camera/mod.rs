//! Orbit camera module
//!
//! Third-person camera that orbits the character by the look angles, with
//! optional occlusion avoidance, sprint FOV and head bob.

mod config;
mod rig;

pub use config::CameraConfig;
pub use rig::{CameraPose, CameraRig};
