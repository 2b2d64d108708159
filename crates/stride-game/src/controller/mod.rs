//! Character controller module
//!
//! One [`CharacterController`] owns the state record for a single character
//! and runs the per-frame pipeline: look, ground probe, jump timers, motion,
//! respawn, rig placement, camera, feedback.

mod config;
mod dynamics;
mod ground;
mod jump;
mod kinematic;
mod motion;
mod state;

pub use config::{ControllerConfig, MotionStrategy};
pub use dynamics::DynamicsIntegrator;
pub use ground::{apply_contact, probe_dynamics, probe_kinematic, GroundContact};
pub use jump::JumpStateMachine;
pub use kinematic::{resolve_horizontal_step, KinematicIntegrator};
pub use motion::{desired_direction, heading_yaw, MotionInput, MotionIntegrator};
pub use state::ControllerState;

use glam::Vec3;
use stride_core::time::clamp_delta;
use stride_core::Transform;
use stride_physics::PhysicsWorld;
use tracing::info;

use crate::camera::{CameraConfig, CameraPose, CameraRig};
use crate::error::ControllerError;
use crate::feedback::{FeedbackBinder, FeedbackConfig, SoundSink};
use crate::input::Intent;
use crate::rig::CharacterRig;

/// Why a respawn happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnCause {
    /// Fell below the world floor limit
    FellOutOfWorld,
    /// Airborne longer than the air-time ceiling
    AirTimeExceeded,
}

/// Outcome of one controller frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Camera pose to render with
    pub camera: CameraPose,
    /// Character feet position after the frame
    pub position: Vec3,
    /// Ground contact found at the start of the frame
    pub grounded: bool,
    /// A jump committed this frame
    pub jumped: bool,
    /// The character was respawned this frame
    pub respawned: Option<RespawnCause>,
    /// Delta actually integrated, after clamping
    pub dt: f32,
}

struct Character {
    state: ControllerState,
    rig: Box<dyn CharacterRig>,
}

/// Third-person character controller
pub struct CharacterController {
    /// Movement tuning
    pub config: ControllerConfig,
    /// Orbit camera
    pub camera: CameraRig,
    /// Animation and audio feedback
    pub feedback: FeedbackBinder,
    jump: JumpStateMachine,
    integrator: Box<dyn MotionIntegrator>,
    character: Option<Character>,
}

impl CharacterController {
    /// Create a controller using the integrator named by `config.strategy`
    pub fn new(config: ControllerConfig, camera: CameraConfig, feedback: FeedbackConfig) -> Self {
        let integrator: Box<dyn MotionIntegrator> = match config.strategy {
            MotionStrategy::Kinematic => Box::new(KinematicIntegrator::new()),
            MotionStrategy::Dynamics => Box::new(DynamicsIntegrator::new()),
        };
        Self::with_integrator(config, camera, feedback, integrator)
    }

    /// Create a controller with the reference tuning for `strategy`
    pub fn for_strategy(strategy: MotionStrategy) -> Self {
        Self::new(
            ControllerConfig::for_strategy(strategy),
            CameraConfig::for_strategy(strategy),
            FeedbackConfig::default(),
        )
    }

    /// Create a controller around a custom integrator
    pub fn with_integrator(
        config: ControllerConfig,
        camera: CameraConfig,
        feedback: FeedbackConfig,
        integrator: Box<dyn MotionIntegrator>,
    ) -> Self {
        info!(strategy = ?integrator.strategy(), "Character controller created");
        Self {
            jump: JumpStateMachine::new(&config),
            config,
            camera: CameraRig::new(camera),
            feedback: FeedbackBinder::new(feedback),
            integrator,
            character: None,
        }
    }

    /// Active motion strategy
    pub fn strategy(&self) -> MotionStrategy {
        self.integrator.strategy()
    }

    /// Hand over a loaded character. Until this succeeds every update is a no-op.
    pub fn attach_character(
        &mut self,
        rig: Box<dyn CharacterRig>,
        spawn: Vec3,
        world: &mut PhysicsWorld,
    ) -> Result<(), ControllerError> {
        if self.character.is_some() {
            return Err(ControllerError::AlreadyAttached);
        }

        let fov = self.camera.config.clamp_fov(self.camera.config.base_fov);
        let state = ControllerState::new(spawn, fov);
        self.integrator.attach(world, &state, &self.config)?;
        self.feedback.reset();

        info!(?spawn, strategy = ?self.strategy(), "Character attached");
        self.character = Some(Character { state, rig });
        Ok(())
    }

    /// Release the character and any backend body, returning its rig
    pub fn detach_character(&mut self, world: &mut PhysicsWorld) -> Option<Box<dyn CharacterRig>> {
        let character = self.character.take()?;
        self.integrator.detach(world);
        info!("Character detached");
        Some(character.rig)
    }

    /// Whether a character is attached
    pub fn is_loaded(&self) -> bool {
        self.character.is_some()
    }

    /// The state record, if a character is attached
    pub fn state(&self) -> Option<&ControllerState> {
        self.character.as_ref().map(|c| &c.state)
    }

    /// Mutable state record, if a character is attached
    pub fn state_mut(&mut self) -> Option<&mut ControllerState> {
        self.character.as_mut().map(|c| &mut c.state)
    }

    /// Move the character and stop its motion
    pub fn teleport(&mut self, world: &mut PhysicsWorld, position: Vec3) {
        if let Some(character) = self.character.as_mut() {
            self.integrator.teleport(&mut character.state, world, position);
        }
    }

    /// Run one frame. Returns `None` while no character is attached.
    pub fn update(
        &mut self,
        intent: &Intent,
        world: &mut PhysicsWorld,
        sound: Option<&mut dyn SoundSink>,
        raw_dt: f32,
    ) -> Option<FrameReport> {
        let character = self.character.as_mut()?;
        let state = &mut character.state;
        let dt = clamp_delta(raw_dt, self.config.max_frame_delta);

        self.camera.apply_look(state, intent.look);
        state.is_moving = intent.is_moving();
        state.is_sprinting = intent.sprint && state.is_moving;

        let contact = self.integrator.probe_ground(world, state, &self.config);
        apply_contact(state, &contact, dt);

        let jumped = self.jump.update(state, intent.jump, dt);

        let input = MotionInput {
            movement: intent.movement,
            sprinting: state.is_sprinting,
            jump: jumped,
            dt,
        };
        self.integrator.step(state, &input, world, &self.config);
        motion::update_presentation(state, intent.movement, &self.config, dt);

        let respawned = respawn_cause(state, &self.config);
        if let Some(cause) = respawned {
            info!(?cause, position = ?state.position, "Respawning character");
            self.integrator
                .teleport(state, world, self.config.respawn_point);
        }

        character.rig.set_transform(Transform::from_yaw_roll(
            state.position,
            state.facing_yaw,
            state.lean_angle,
        ));

        let probe = world.probe_excluding(self.integrator.excluded_body());
        let camera = self.camera.update(state, Some(&probe), dt);

        self.feedback
            .update(state, jumped, character.rig.as_mut(), sound, dt);

        Some(FrameReport {
            camera,
            position: state.position,
            grounded: contact.grounded,
            jumped,
            respawned,
            dt,
        })
    }
}

fn respawn_cause(state: &ControllerState, config: &ControllerConfig) -> Option<RespawnCause> {
    if state.position.y < config.fall_limit || !state.position.is_finite() {
        Some(RespawnCause::FellOutOfWorld)
    } else if state.air_time > config.max_air_time {
        Some(RespawnCause::AirTimeExceeded)
    } else {
        None
    }
}
