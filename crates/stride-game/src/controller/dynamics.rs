//! Rigid-body integration through the physics backend

use glam::Vec3;
use stride_physics::{
    CharacterBody, CharacterBodyConfig, PhysicsError, PhysicsWorld, RigidBodyHandle,
};
use tracing::{debug, warn};

use super::ground::probe_dynamics;
use super::motion::{desired_direction, MotionInput, MotionIntegrator};
use super::{ControllerConfig, ControllerState, GroundContact, MotionStrategy};

/// Drives a rotation-locked capsule with velocity commands.
///
/// Horizontal velocity is overwritten every frame; vertical velocity is left
/// to the backend's gravity except on a jump. Position is only ever read
/// back after the world has stepped.
#[derive(Debug, Default)]
pub struct DynamicsIntegrator {
    body: Option<CharacterBody>,
}

impl DynamicsIntegrator {
    /// Create with no body
    pub fn new() -> Self {
        Self::default()
    }

    /// The spawned body, if attached
    pub fn body(&self) -> Option<&CharacterBody> {
        self.body.as_ref()
    }

    fn body_config(world: &PhysicsWorld, config: &ControllerConfig) -> CharacterBodyConfig {
        let world_gravity = world.config.gravity.y;
        let gravity_scale = if world_gravity < -f32::EPSILON {
            config.gravity / world_gravity
        } else {
            1.0
        };
        CharacterBodyConfig {
            height: config.height,
            radius: config.radius,
            linear_damping: config.linear_damping,
            gravity_scale,
            ccd: true,
        }
    }
}

impl MotionIntegrator for DynamicsIntegrator {
    fn strategy(&self) -> MotionStrategy {
        MotionStrategy::Dynamics
    }

    fn attach(
        &mut self,
        world: &mut PhysicsWorld,
        state: &ControllerState,
        config: &ControllerConfig,
    ) -> Result<(), PhysicsError> {
        self.detach(world);
        let body = CharacterBody::spawn(world, Self::body_config(world, config), state.position)?;
        debug!(gravity_scale = body.config.gravity_scale, "Dynamics body attached");
        self.body = Some(body);
        Ok(())
    }

    fn detach(&mut self, world: &mut PhysicsWorld) {
        if let Some(body) = self.body.take() {
            body.despawn(world);
        }
    }

    fn probe_ground(
        &self,
        world: &PhysicsWorld,
        state: &ControllerState,
        config: &ControllerConfig,
    ) -> GroundContact {
        if self.body.is_none() {
            return GroundContact::airborne();
        }
        probe_dynamics(&world.probe_excluding(self.excluded_body()), state, config)
    }

    fn step(
        &mut self,
        state: &mut ControllerState,
        input: &MotionInput,
        world: &mut PhysicsWorld,
        config: &ControllerConfig,
    ) {
        let Some(body) = &self.body else {
            return;
        };
        let Some(current) = body.linear_velocity(world) else {
            return;
        };

        let horizontal =
            desired_direction(input.movement, state.yaw) * config.move_speed(input.sprinting);
        let vertical = if input.jump {
            config.jump_force
        } else {
            current.y
        };
        if let Err(e) =
            body.set_linear_velocity(world, Vec3::new(horizontal.x, vertical, horizontal.z))
        {
            warn!("Dropping velocity command: {}", e);
            return;
        }

        world.step(input.dt);

        if let Some(feet) = body.feet_position(world) {
            state.position = feet;
        }
        if let Some(velocity) = body.linear_velocity(world) {
            state.vertical_velocity = velocity.y;
        }
    }

    fn teleport(&mut self, state: &mut ControllerState, world: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = &self.body {
            if let Err(e) = body.teleport(world, position) {
                warn!("Teleport failed: {}", e);
            }
        }
        state.respawn_at(position);
    }

    fn excluded_body(&self) -> Option<RigidBodyHandle> {
        self.body.as_ref().map(CharacterBody::handle)
    }
}
