//! Dynamic capsule body for characters driven by velocity commands

use glam::Vec3;
use rapier3d::prelude::*;
use tracing::debug;

use crate::{PhysicsError, PhysicsWorld};

/// Character body configuration
#[derive(Debug, Clone)]
pub struct CharacterBodyConfig {
    /// Capsule height, feet to crown (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Linear damping handed to the rigid body
    pub linear_damping: f32,
    /// Multiplier on the world gravity for this body
    pub gravity_scale: f32,
    /// Enable continuous collision detection against fast motion
    pub ccd: bool,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            linear_damping: 0.0,
            gravity_scale: 1.0,
            ccd: true,
        }
    }
}

impl CharacterBodyConfig {
    /// Distance from the feet to the capsule center
    pub fn center_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// A rotation-locked dynamic capsule. The backend owns its position; callers
/// issue velocity commands and read the result back after each step.
#[derive(Debug, Clone)]
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl CharacterBody {
    /// Spawn the body with its feet at `feet`
    pub fn spawn(
        physics: &mut PhysicsWorld,
        config: CharacterBodyConfig,
        feet: Vec3,
    ) -> Result<Self, PhysicsError> {
        if config.radius <= 0.0 || config.height <= 2.0 * config.radius {
            return Err(PhysicsError::InvalidCapsule {
                height: config.height,
                radius: config.radius,
            });
        }

        let center = feet + Vec3::Y * config.center_height();
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y, center.z])
            .linear_damping(config.linear_damping)
            .gravity_scale(config.gravity_scale)
            .lock_rotations()
            .ccd_enabled(config.ccd)
            .build();

        let half_height = config.center_height() - config.radius;
        // Frictionless so walls are slid along instead of gripped.
        let collider = ColliderBuilder::capsule_y(half_height, config.radius)
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .build();

        let (body, collider) = physics.add_dynamic_body(rigid_body, collider);
        debug!(?feet, "Spawned character body");

        Ok(Self {
            config,
            body,
            collider,
        })
    }

    /// The rigid body handle, for filtering self-hits out of queries
    pub fn handle(&self) -> RigidBodyHandle {
        self.body
    }

    /// The capsule collider handle
    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    /// Current feet position as integrated by the backend
    pub fn feet_position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.get_rigid_body(self.body).map(|rb| {
            let t = rb.translation();
            Vec3::new(t.x, t.y, t.z) - Vec3::Y * self.config.center_height()
        })
    }

    /// Current linear velocity
    pub fn linear_velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.get_rigid_body(self.body).map(|rb| {
            let v = rb.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Overwrite the linear velocity
    pub fn set_linear_velocity(
        &self,
        physics: &mut PhysicsWorld,
        velocity: Vec3,
    ) -> Result<(), PhysicsError> {
        let rb = physics
            .get_rigid_body_mut(self.body)
            .ok_or(PhysicsError::MissingBody)?;
        rb.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        Ok(())
    }

    /// Move the body so its feet are at `feet` and stop it
    pub fn teleport(&self, physics: &mut PhysicsWorld, feet: Vec3) -> Result<(), PhysicsError> {
        let center = feet + Vec3::Y * self.config.center_height();
        let rb = physics
            .get_rigid_body_mut(self.body)
            .ok_or(PhysicsError::MissingBody)?;
        rb.set_translation(vector![center.x, center.y, center.z], true);
        rb.set_linvel(vector![0.0, 0.0, 0.0], true);
        Ok(())
    }

    /// Remove the body and its collider from the world
    pub fn despawn(self, physics: &mut PhysicsWorld) {
        physics.remove_rigid_body(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_capsule() {
        let mut world = PhysicsWorld::new();
        let config = CharacterBodyConfig {
            height: 0.5,
            radius: 0.4,
            ..Default::default()
        };
        let err = CharacterBody::spawn(&mut world, config, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidCapsule { .. }));
    }

    #[test]
    fn test_body_falls_and_rests_on_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let body =
            CharacterBody::spawn(&mut world, CharacterBodyConfig::default(), Vec3::new(0.0, 2.0, 0.0))
                .expect("valid capsule");

        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }

        let feet = body.feet_position(&world).expect("body exists");
        assert!(feet.y.abs() < 0.05, "feet should rest on the ground: {feet:?}");
    }

    #[test]
    fn test_velocity_command_moves_body() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let body = CharacterBody::spawn(&mut world, CharacterBodyConfig::default(), Vec3::ZERO)
            .expect("valid capsule");

        for _ in 0..30 {
            let v = body.linear_velocity(&world).expect("body exists");
            body.set_linear_velocity(&mut world, Vec3::new(4.0, v.y, 0.0))
                .expect("body exists");
            world.step(1.0 / 60.0);
        }

        let feet = body.feet_position(&world).expect("body exists");
        assert!(feet.x > 1.5, "body should travel along +X: {feet:?}");
    }

    #[test]
    fn test_teleport_and_despawn() {
        let mut world = PhysicsWorld::new();
        let body = CharacterBody::spawn(&mut world, CharacterBodyConfig::default(), Vec3::ZERO)
            .expect("valid capsule");
        body.teleport(&mut world, Vec3::new(1.0, 5.0, 2.0))
            .expect("body exists");
        let feet = body.feet_position(&world).expect("body exists");
        assert!((feet - Vec3::new(1.0, 5.0, 2.0)).length() < 1e-4);
        assert_eq!(body.linear_velocity(&world), Some(Vec3::ZERO));

        body.despawn(&mut world);
        assert_eq!(world.collider_count(), 0);
    }
}
