//! Controller tuning

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which integrator moves the character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionStrategy {
    /// Manual gravity and raycast collision against registered geometry
    #[default]
    Kinematic,
    /// Velocity commands to a rigid-body capsule in the physics backend
    Dynamics,
}

/// Movement, jumping, grounding and respawn tuning.
///
/// [`ControllerConfig::kinematic`] and [`ControllerConfig::dynamics`] are the
/// two reference tunings; `Default` is the kinematic one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Integrator used for this character
    pub strategy: MotionStrategy,

    /// Base horizontal speed (m/s)
    pub walk_speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,

    /// Gravity acceleration (negative, m/s²)
    pub gravity: f32,
    /// Upward velocity applied on a committed jump (m/s)
    pub jump_force: f32,
    /// Grace window after leaving the ground (seconds)
    pub coyote_time: f32,
    /// Grace window before landing for an early jump press (seconds)
    pub jump_buffer: f32,
    /// Terminal falling speed (m/s, positive)
    pub max_fall_speed: f32,

    /// Capsule radius (m)
    pub radius: f32,
    /// Capsule height, feet to crown (m)
    pub height: f32,
    /// Height the feet rest above the surface hit point
    pub ground_clearance: f32,
    /// Ground probes start this far above the feet
    pub ground_probe_lift: f32,
    /// Extra reach below the clearance that still counts as contact (kinematic)
    pub ground_snap_distance: f32,
    /// Reach below the feet that counts as contact (dynamics)
    pub ground_reach: f32,
    /// Downward speed above which the dynamics probe refuses to report ground
    pub descent_threshold: f32,
    /// Height above the feet of the horizontal wall probe
    pub wall_probe_height: f32,
    /// Linear damping of the dynamics body
    pub linear_damping: f32,

    /// Facing turn blend rate per 60 Hz frame (0-1)
    pub turn_blend: f32,
    /// Maximum cosmetic lean into strafes (degrees)
    pub max_lean_degrees: f32,
    /// Lean blend rate per 60 Hz frame (0-1)
    pub lean_blend: f32,

    /// Where the character reappears after a respawn
    pub respawn_point: Vec3,
    /// Falling below this height respawns
    pub fall_limit: f32,
    /// Continuous air time above this respawns (seconds)
    pub max_air_time: f32,
    /// Frame deltas above this are clamped before integration (seconds)
    pub max_frame_delta: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::kinematic()
    }
}

impl ControllerConfig {
    /// Tuning for the raycast-driven kinematic controller
    pub fn kinematic() -> Self {
        Self {
            strategy: MotionStrategy::Kinematic,
            walk_speed: 6.0,
            sprint_multiplier: 2.0,
            gravity: -30.0,
            jump_force: 15.0,
            coyote_time: 0.15,
            jump_buffer: 0.15,
            max_fall_speed: 50.0,
            radius: 0.4,
            height: 1.8,
            ground_clearance: 0.05,
            ground_probe_lift: 0.5,
            ground_snap_distance: 0.2,
            ground_reach: 0.15,
            descent_threshold: 0.5,
            wall_probe_height: 0.5,
            linear_damping: 0.0,
            turn_blend: 0.2,
            max_lean_degrees: 8.0,
            lean_blend: 0.1,
            respawn_point: Vec3::new(0.0, 5.0, 0.0),
            fall_limit: -50.0,
            max_air_time: 2.5,
            max_frame_delta: 0.1,
        }
    }

    /// Tuning for the rigid-body controller
    pub fn dynamics() -> Self {
        Self {
            strategy: MotionStrategy::Dynamics,
            walk_speed: 5.0,
            gravity: -40.0,
            jump_force: 18.0,
            ground_clearance: 0.0,
            linear_damping: 0.5,
            ..Self::kinematic()
        }
    }

    /// Preset matching a strategy
    pub fn for_strategy(strategy: MotionStrategy) -> Self {
        match strategy {
            MotionStrategy::Kinematic => Self::kinematic(),
            MotionStrategy::Dynamics => Self::dynamics(),
        }
    }

    /// Horizontal speed for the current sprint state
    pub fn move_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.walk_speed * self.sprint_multiplier
        } else {
            self.walk_speed
        }
    }

    /// Maximum lean in radians
    pub fn max_lean(&self) -> f32 {
        self.max_lean_degrees.to_radians()
    }
}
