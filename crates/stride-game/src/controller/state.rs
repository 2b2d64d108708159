//! The per-character simulation record

use glam::Vec3;

/// Everything the per-frame pipeline reads and writes for one character.
///
/// Created when the character is attached; a respawn resets placement and
/// motion in place rather than replacing the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    /// Feet position
    pub position: Vec3,
    /// Direction the model faces (radians, 0 faces -Z)
    pub facing_yaw: f32,
    /// Signed vertical speed (m/s)
    pub vertical_velocity: f32,

    /// Recomputed from geometry every frame
    pub grounded: bool,
    /// Continuous time without ground contact (seconds)
    pub air_time: f32,
    /// Remaining coyote window; only `> 0` is significant
    pub coyote_timer: f32,
    /// Remaining jump buffer window; only `> 0` is significant
    pub jump_buffer_timer: f32,
    /// Jump input state last frame, for rising-edge detection
    pub jump_was_held: bool,

    /// Camera yaw (radians)
    pub yaw: f32,
    /// Camera pitch (radians), always within the rig's clamp
    pub pitch: f32,

    /// Movement intent is non-zero
    pub is_moving: bool,
    /// Sprint held while moving
    pub is_sprinting: bool,

    /// Cosmetic roll into strafes (radians)
    pub lean_angle: f32,
    /// Head-bob accumulator, zero whenever not walking on ground
    pub head_bob_phase: f32,
    /// Current field of view (degrees)
    pub fov: f32,

    /// Last surface point under the feet, if grounded
    pub ground_point: Option<Vec3>,
}

impl ControllerState {
    /// Fresh state standing at `spawn`
    pub fn new(spawn: Vec3, fov: f32) -> Self {
        Self {
            position: spawn,
            facing_yaw: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            air_time: 0.0,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            jump_was_held: false,
            yaw: 0.0,
            pitch: 0.0,
            is_moving: false,
            is_sprinting: false,
            lean_angle: 0.0,
            head_bob_phase: 0.0,
            fov,
            ground_point: None,
        }
    }

    /// Put the character back at `point` with no vertical motion and no
    /// pending jump. Look angles and cosmetics are kept.
    pub fn respawn_at(&mut self, point: Vec3) {
        self.position = point;
        self.vertical_velocity = 0.0;
        self.air_time = 0.0;
        self.grounded = false;
        self.coyote_timer = 0.0;
        self.jump_buffer_timer = 0.0;
        self.head_bob_phase = 0.0;
        self.ground_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respawn_keeps_look_angles() {
        let mut state = ControllerState::new(Vec3::ZERO, 75.0);
        state.position = Vec3::new(3.0, -60.0, 2.0);
        state.vertical_velocity = -45.0;
        state.air_time = 1.0;
        state.jump_buffer_timer = 0.1;
        state.yaw = 1.2;
        state.pitch = -0.3;

        state.respawn_at(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(state.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(state.vertical_velocity, 0.0);
        assert_eq!(state.air_time, 0.0);
        assert_eq!(state.jump_buffer_timer, 0.0);
        assert_eq!(state.yaw, 1.2);
        assert_eq!(state.pitch, -0.3);
    }
}
