//! Raycast-driven kinematic integration

use glam::Vec3;
use stride_physics::{CollisionProbe, PhysicsError, PhysicsWorld};

use super::ground::probe_kinematic;
use super::motion::{desired_direction, MotionInput, MotionIntegrator};
use super::{ControllerConfig, ControllerState, GroundContact, MotionStrategy};

/// Projection passes before a step is given up as blocked
const MAX_SLIDE_ITERATIONS: usize = 3;

/// Approach shortfalls below this are treated as already resting on the wall
const CONTACT_EPSILON: f32 = 1e-4;

/// Wall sweeps use a ball this much smaller than the capsule so resting
/// contact never reads as overlap
const SKIN_WIDTH: f32 = 0.01;

/// Surfaces whose normal is at least this upright are walked onto, not slid along
const WALKABLE_NORMAL_Y: f32 = 0.6;

/// Moves the character directly: manual gravity, a downward sweep for
/// landing, an upward sweep for ceilings, and a wall probe that slides the
/// horizontal step along whatever it hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicIntegrator;

impl KinematicIntegrator {
    /// Create the integrator
    pub fn new() -> Self {
        Self
    }

    /// Advance `state` against an arbitrary collision probe
    pub fn advance(
        &self,
        state: &mut ControllerState,
        input: &MotionInput,
        probe: &dyn CollisionProbe,
        config: &ControllerConfig,
    ) {
        let dt = input.dt;
        if dt <= 0.0 {
            return;
        }

        if input.jump {
            state.vertical_velocity = config.jump_force;
            state.grounded = false;
        } else {
            state.vertical_velocity += config.gravity * dt;
        }
        state.vertical_velocity = state.vertical_velocity.max(-config.max_fall_speed);

        integrate_vertical(state, probe, config, dt);

        let direction = desired_direction(input.movement, state.yaw);
        let step = direction * config.move_speed(input.sprinting) * dt;
        let origin = state.position + Vec3::Y * config.wall_probe_height;
        state.position += resolve_horizontal_step(probe, origin, step, config.radius);
    }
}

impl MotionIntegrator for KinematicIntegrator {
    fn strategy(&self) -> MotionStrategy {
        MotionStrategy::Kinematic
    }

    fn attach(
        &mut self,
        _world: &mut PhysicsWorld,
        _state: &ControllerState,
        _config: &ControllerConfig,
    ) -> Result<(), PhysicsError> {
        Ok(())
    }

    fn detach(&mut self, _world: &mut PhysicsWorld) {}

    fn probe_ground(
        &self,
        world: &PhysicsWorld,
        state: &ControllerState,
        config: &ControllerConfig,
    ) -> GroundContact {
        probe_kinematic(world, state, config)
    }

    fn step(
        &mut self,
        state: &mut ControllerState,
        input: &MotionInput,
        world: &mut PhysicsWorld,
        config: &ControllerConfig,
    ) {
        self.advance(state, input, world, config);
    }

    fn teleport(&mut self, state: &mut ControllerState, _world: &mut PhysicsWorld, position: Vec3) {
        state.respawn_at(position);
    }
}

/// Apply `vertical_velocity * dt`, stopping at floors and ceilings.
fn integrate_vertical(
    state: &mut ControllerState,
    probe: &dyn CollisionProbe,
    config: &ControllerConfig,
    dt: f32,
) {
    let dy = state.vertical_velocity * dt;

    if dy < 0.0 {
        // Sweep from above the feet so a fast fall cannot skip a thin floor.
        let lift = config.ground_probe_lift;
        let origin = state.position + Vec3::Y * lift;
        let reach = lift + config.ground_clearance - dy;
        if let Some(hit) = probe.cast_ray(origin, Vec3::NEG_Y, reach) {
            let landing = hit.point.y + config.ground_clearance;
            if state.position.y + dy <= landing {
                state.position.y = landing;
                state.vertical_velocity = 0.0;
                return;
            }
        }
    } else if dy > 0.0 {
        let start = config.wall_probe_height.min(config.height);
        let origin = state.position + Vec3::Y * start;
        let reach = config.height - start + dy;
        if let Some(hit) = probe.cast_ray(origin, Vec3::Y, reach) {
            state.position.y = (hit.point.y - config.height).max(state.position.y);
            state.vertical_velocity = 0.0;
            return;
        }
    }

    state.position.y += dy;
}

/// Clip a horizontal step against walls.
///
/// Sweeps a ball of `radius` (less a thin skin) from `origin` along the
/// step. A hit with a usable normal has the into-wall component cut back to
/// whatever still fits in front of the wall, then the step is swept again; a
/// hit without a normal blocks the step entirely.
pub fn resolve_horizontal_step(
    probe: &dyn CollisionProbe,
    origin: Vec3,
    step: Vec3,
    radius: f32,
) -> Vec3 {
    let skin = SKIN_WIDTH.min(radius * 0.5);
    let sweep_radius = radius - skin;
    let mut step = step;

    for _ in 0..MAX_SLIDE_ITERATIONS {
        let length = step.length();
        if length <= f32::EPSILON {
            return Vec3::ZERO;
        }
        let direction = step / length;

        let Some(hit) = probe.cast_sphere(origin, sweep_radius, direction, length) else {
            return step;
        };
        let Some(normal) = hit.normal else {
            return Vec3::ZERO;
        };
        if normal.y >= WALKABLE_NORMAL_Y {
            return step;
        }
        let Some(wall_normal) = Vec3::new(normal.x, 0.0, normal.z).try_normalize() else {
            return Vec3::ZERO;
        };

        let into_wall = step.dot(wall_normal);
        if into_wall >= 0.0 {
            return step;
        }
        // Approach still available before the full radius touches the wall.
        let gap = (hit.distance * -direction.dot(wall_normal) - skin).max(0.0);
        let excess = (into_wall + gap).min(0.0);
        if excess > -CONTACT_EPSILON {
            return step;
        }
        step -= wall_normal * excess;
    }

    let length = step.length();
    let Some(direction) = step.try_normalize() else {
        return Vec3::ZERO;
    };
    match probe.cast_sphere(origin, sweep_radius, direction, length) {
        None => step,
        Some(hit) if hit.normal.is_some_and(|n| n.y >= WALKABLE_NORMAL_Y) => step,
        Some(_) => Vec3::ZERO,
    }
}
