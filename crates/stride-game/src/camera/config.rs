//! Camera configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::controller::MotionStrategy;

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera offset from the look target before rotation (+Z is behind)
    pub offset: Vec3,
    /// Look target offset from the character's feet
    pub look_target_offset: Vec3,
    /// Symmetric pitch limit in degrees
    pub pitch_limit_degrees: f32,
    /// Field of view while not sprinting (degrees)
    pub base_fov: f32,
    /// Field of view while sprinting (degrees)
    pub sprint_fov: f32,
    /// FOV blend rate per 60 Hz frame (0-1)
    pub fov_blend: f32,
    /// Lowest accepted FOV (degrees)
    pub min_fov: f32,
    /// Highest accepted FOV (degrees)
    pub max_fov: f32,
    /// Head-bob phase speed (radians per second)
    pub bob_frequency: f32,
    /// Head-bob height amplitude (m)
    pub bob_amplitude: f32,
    /// Pull the camera in when geometry blocks the view
    pub occlusion: bool,
    /// Clearance kept between the camera and an occluder
    pub collision_radius: f32,
    /// Closest the camera is pulled toward the target
    pub min_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 0.5, 4.0),
            look_target_offset: Vec3::new(0.0, 1.5, 0.0),
            pitch_limit_degrees: 60.0,
            base_fov: 75.0,
            sprint_fov: 85.0,
            fov_blend: 0.1,
            min_fov: 30.0,
            max_fov: 120.0,
            bob_frequency: 10.0,
            bob_amplitude: 0.05,
            occlusion: true,
            collision_radius: 0.3,
            min_distance: 0.5,
        }
    }
}

impl CameraConfig {
    /// Reference camera for each strategy; only the kinematic one avoids occluders
    pub fn for_strategy(strategy: MotionStrategy) -> Self {
        match strategy {
            MotionStrategy::Kinematic => Self::default(),
            MotionStrategy::Dynamics => Self {
                occlusion: false,
                ..Self::default()
            },
        }
    }

    /// Pitch limit in radians
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit_degrees.abs().to_radians()
    }

    /// Clamp a FOV into the accepted range
    pub fn clamp_fov(&self, fov: f32) -> f32 {
        let fov = if fov.is_finite() { fov } else { self.base_fov };
        fov.max(self.min_fov).min(self.max_fov)
    }
}
