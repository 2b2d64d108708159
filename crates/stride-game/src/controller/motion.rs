//! The integrator seam shared by both strategies

use glam::{Quat, Vec2, Vec3};
use stride_core::{ease_angle_toward, ease_toward};
use stride_physics::{PhysicsError, PhysicsWorld, RigidBodyHandle};

use super::{ControllerConfig, ControllerState, GroundContact, MotionStrategy};

/// What the integrator needs from this frame's input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionInput {
    /// Strafe / forward axes, forward key = -1
    pub movement: Vec2,
    /// Sprint speed applies
    pub sprinting: bool,
    /// A jump committed this frame
    pub jump: bool,
    /// Clamped frame delta (seconds)
    pub dt: f32,
}

/// Moves the character for one frame.
///
/// Selected once when the controller is built. Every method must be a
/// harmless no-op when nothing is attached.
pub trait MotionIntegrator {
    /// Which strategy this is
    fn strategy(&self) -> MotionStrategy;

    /// Create any backend objects for a character standing at `state.position`
    fn attach(
        &mut self,
        world: &mut PhysicsWorld,
        state: &ControllerState,
        config: &ControllerConfig,
    ) -> Result<(), PhysicsError>;

    /// Remove backend objects created by [`MotionIntegrator::attach`]
    fn detach(&mut self, world: &mut PhysicsWorld);

    /// Probe for ground under the character
    fn probe_ground(
        &self,
        world: &PhysicsWorld,
        state: &ControllerState,
        config: &ControllerConfig,
    ) -> GroundContact;

    /// Advance position and vertical velocity by `input.dt`
    fn step(
        &mut self,
        state: &mut ControllerState,
        input: &MotionInput,
        world: &mut PhysicsWorld,
        config: &ControllerConfig,
    );

    /// Move the character to `position` and stop it
    fn teleport(&mut self, state: &mut ControllerState, world: &mut PhysicsWorld, position: Vec3);

    /// Rigid body that scene queries (camera, ground) should ignore
    fn excluded_body(&self) -> Option<RigidBodyHandle> {
        None
    }
}

/// World-space unit direction for `movement` relative to camera `yaw`,
/// or zero when there is no movement.
pub fn desired_direction(movement: Vec2, yaw: f32) -> Vec3 {
    match Vec3::new(movement.x, 0.0, movement.y).try_normalize() {
        Some(local) => Quat::from_rotation_y(yaw) * local,
        None => Vec3::ZERO,
    }
}

/// Yaw that faces along `direction` (0 faces -Z)
pub fn heading_yaw(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Ease facing toward the movement heading and lean into strafes
pub fn update_presentation(
    state: &mut ControllerState,
    movement: Vec2,
    config: &ControllerConfig,
    dt: f32,
) {
    let direction = desired_direction(movement, state.yaw);
    let lean_target = if direction == Vec3::ZERO {
        0.0
    } else {
        let target = heading_yaw(direction);
        state.facing_yaw = ease_angle_toward(state.facing_yaw, target, config.turn_blend, dt);
        -movement.x.clamp(-1.0, 1.0) * config.max_lean()
    };
    state.lean_angle = ease_toward(state.lean_angle, lean_target, config.lean_blend, dt);
}
