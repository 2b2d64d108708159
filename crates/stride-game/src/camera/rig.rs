//! Orbit camera rig

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use stride_core::ease::{ease_toward, wrap_angle};
use stride_physics::CollisionProbe;
use tracing::debug;

use super::CameraConfig;
use crate::controller::ControllerState;

/// Where the camera is this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera world position
    pub position: Vec3,
    /// Point looked at
    pub target: Vec3,
    /// Field of view (degrees)
    pub fov: f32,
    /// Boom length after occlusion
    pub distance: f32,
}

impl CameraPose {
    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.fov.is_finite()
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get a projection matrix for this pose's FOV
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, 0.1, 1000.0)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 4.0),
            target: Vec3::new(0.0, 1.5, 0.0),
            fov: 75.0,
            distance: 4.0,
        }
    }
}

/// Computes the orbit camera from the controller state
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Configuration
    pub config: CameraConfig,
    last_pose: CameraPose,
}

impl CameraRig {
    /// Create a rig
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            last_pose: CameraPose::default(),
        }
    }

    /// Last pose produced by [`CameraRig::update`]
    pub fn pose(&self) -> CameraPose {
        self.last_pose
    }

    /// Apply look deltas (radians). Pitch is clamped after every change.
    pub fn apply_look(&self, state: &mut ControllerState, look: Vec2) {
        if look.is_finite() {
            state.yaw = wrap_angle(state.yaw + look.x);
            state.pitch += look.y;
        }
        self.clamp_pitch(state);
    }

    /// Force pitch back into the symmetric limit
    pub fn clamp_pitch(&self, state: &mut ControllerState) {
        let limit = self.config.pitch_limit();
        state.pitch = if state.pitch.is_finite() {
            state.pitch.max(-limit).min(limit)
        } else {
            0.0
        };
    }

    /// Ease FOV, advance head bob and place the camera.
    ///
    /// With occlusion enabled and a probe given, the boom is shortened to
    /// stay in front of the first surface between the look target and the
    /// camera. A non-finite result keeps the previous pose.
    pub fn update(
        &mut self,
        state: &mut ControllerState,
        probe: Option<&dyn CollisionProbe>,
        dt: f32,
    ) -> CameraPose {
        let fov_target = if state.is_sprinting {
            self.config.sprint_fov
        } else {
            self.config.base_fov
        };
        state.fov = self
            .config
            .clamp_fov(ease_toward(state.fov, fov_target, self.config.fov_blend, dt));

        if state.grounded && state.is_moving {
            state.head_bob_phase += dt * self.config.bob_frequency;
        } else {
            state.head_bob_phase = 0.0;
        }
        let bob = state.head_bob_phase.sin() * self.config.bob_amplitude;

        let target = state.position + self.config.look_target_offset;
        let rotation = Quat::from_euler(EulerRot::YXZ, state.yaw, state.pitch, 0.0);
        let arm = rotation * self.config.offset;
        let nominal = arm.length();
        let direction = arm.normalize_or_zero();

        let mut distance = nominal;
        if let Some(probe) = probe.filter(|_| self.config.occlusion) {
            let radius = self.config.collision_radius;
            if let Some(hit) = probe.cast_ray(target, direction, nominal + radius) {
                distance = (hit.distance - radius)
                    .max(self.config.min_distance)
                    .min(nominal);
                debug!(distance, nominal, "Camera pulled in by occluder");
            }
        }

        let pose = CameraPose {
            position: target + direction * distance + Vec3::Y * bob,
            target,
            fov: state.fov,
            distance,
        };
        if pose.is_finite() {
            self.last_pose = pose;
        }
        self.last_pose
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_3;

    use stride_physics::PhysicsWorld;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn state() -> ControllerState {
        ControllerState::new(Vec3::ZERO, 75.0)
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let rig = CameraRig::default();
        let mut state = state();
        for i in 0..200 {
            let dy = if i % 3 == 0 { -0.4 } else { 0.25 };
            rig.apply_look(&mut state, Vec2::new(0.1, dy));
            assert!(state.pitch >= -FRAC_PI_3 - 1e-5 && state.pitch <= FRAC_PI_3 + 1e-5);
        }
        rig.apply_look(&mut state, Vec2::new(0.0, 100.0));
        assert!((state.pitch - FRAC_PI_3).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_look_is_ignored() {
        let rig = CameraRig::default();
        let mut state = state();
        state.yaw = 0.5;
        rig.apply_look(&mut state, Vec2::new(f32::NAN, f32::INFINITY));
        assert_eq!(state.yaw, 0.5);
        assert_eq!(state.pitch, 0.0);
    }

    #[test]
    fn test_default_pose_is_behind_and_above() {
        let mut rig = CameraRig::default();
        let mut state = state();
        let pose = rig.update(&mut state, None, DT);
        assert!(pose.position.z > 3.9);
        assert!(pose.position.y > pose.target.y);
        assert!((pose.distance - Vec3::new(0.0, 0.5, 4.0).length()).abs() < 1e-5);
    }

    #[test]
    fn test_pose_matrices_look_at_target() {
        let pose = CameraPose::default();
        let in_view = pose.view_matrix().transform_point3(pose.target);
        let reach = (pose.target - pose.position).length();
        assert!(in_view.truncate().length() < 1e-4, "{in_view:?}");
        assert!((in_view.z + reach).abs() < 1e-4, "{in_view:?}");

        let projection = pose.projection_matrix(16.0 / 9.0);
        let focal = 1.0 / (pose.fov.to_radians() * 0.5).tan();
        assert!((projection.y_axis.y - focal).abs() < 1e-4);
        assert!((projection.x_axis.x - focal * 9.0 / 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_sprint_fov_eases_without_overshoot() {
        let mut rig = CameraRig::default();
        let mut state = state();
        state.is_moving = true;
        state.is_sprinting = true;

        let mut last = state.fov;
        for _ in 0..300 {
            rig.update(&mut state, None, DT);
            assert!(state.fov >= last);
            assert!(state.fov <= rig.config.sprint_fov);
            last = state.fov;
        }
        assert!((state.fov - rig.config.sprint_fov).abs() < 0.01);

        // One frame at 60 Hz moves exactly blend * remaining
        state.is_sprinting = false;
        let before = state.fov;
        rig.update(&mut state, None, DT);
        let expected = before + (rig.config.base_fov - before) * rig.config.fov_blend;
        assert!((state.fov - expected).abs() < 1e-3);
    }

    #[test]
    fn test_head_bob_resets_when_still_or_airborne() {
        let mut rig = CameraRig::default();
        let mut state = state();
        state.grounded = true;
        state.is_moving = true;
        rig.update(&mut state, None, DT);
        rig.update(&mut state, None, DT);
        assert!(state.head_bob_phase > 0.0);

        state.is_moving = false;
        rig.update(&mut state, None, DT);
        assert_eq!(state.head_bob_phase, 0.0);

        state.is_moving = true;
        rig.update(&mut state, None, DT);
        state.grounded = false;
        rig.update(&mut state, None, DT);
        assert_eq!(state.head_bob_phase, 0.0);
    }

    #[test]
    fn test_occluder_pulls_camera_in() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(5.0, 5.0, 0.1), Vec3::new(0.0, 0.0, 2.0));

        let mut rig = CameraRig::default();
        let mut state = state();
        let pose = rig.update(&mut state, Some(&world), DT);
        assert!(pose.distance < 2.0, "{}", pose.distance);
        assert!(pose.position.z < 1.9);

        let mut open_rig = CameraRig::new(CameraConfig {
            occlusion: false,
            ..Default::default()
        });
        let pose = open_rig.update(&mut state, Some(&world), DT);
        assert!(pose.distance > 4.0);
    }
}
