//! Stride Physics - Collision queries and rigid bodies using rapier3d
//!
//! Provides the registered collidable set the kinematic controller raycasts
//! against, and the rigid-body backend the dynamics controller delegates to.

mod character_body;
mod error;

pub use character_body::{CharacterBody, CharacterBodyConfig};
pub use error::PhysicsError;
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;

/// Normals shorter than this are reported as unusable.
const MIN_NORMAL_LENGTH_SQUARED: f32 = 1e-6;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector applied to dynamic bodies
    pub gravity: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Result of a directed probe against the collidable set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the (normalized) probe direction
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal, absent when the backend could not produce one
    /// (e.g. the probe started inside a solid)
    pub normal: Option<Vec3>,
}

/// A directed collision query: origin, direction, max distance.
pub trait CollisionProbe {
    /// Return the nearest hit within `max_distance`, or `None`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Sweep a sphere of `radius` centered at `origin`. `distance` is how far
    /// the center travels before touching; the normal faces the sweep.
    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit>;
}

/// Orient a backend normal against the query direction and drop degenerate ones.
fn facing_normal(normal: Vec3, direction: Vec3) -> Option<Vec3> {
    if normal.length_squared() <= MIN_NORMAL_LENGTH_SQUARED || !normal.is_finite() {
        return None;
    }
    let normal = normal.normalize();
    Some(if normal.dot(direction) > 0.0 { -normal } else { normal })
}

/// The physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Advance the simulation by `dt` seconds. Zero-length steps are skipped.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.query_pipeline.update(&self.collider_set);
    }

    /// Register a static collider. It is visible to queries immediately.
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    /// Add a dynamic rigid body with an attached collider
    pub fn add_dynamic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        self.query_pipeline.update(&self.collider_set);
        (rb_handle, col_handle)
    }

    /// Remove a rigid body and its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.query_pipeline.update(&self.collider_set);
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable rigid body by handle
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Cast a ray and return the nearest hit with its surface normal.
    ///
    /// `direction` need not be normalized; a zero direction never hits.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        if max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(_handle, intersection)| {
                let normal = Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                );
                RayHit {
                    distance: intersection.time_of_impact,
                    point: origin + direction * intersection.time_of_impact,
                    normal: (normal.length_squared() > MIN_NORMAL_LENGTH_SQUARED)
                        .then(|| normal.normalize()),
                }
            })
    }

    /// Sweep a ball along `direction` and return the first contact.
    ///
    /// A ball that already overlaps geometry reports distance zero.
    pub fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        if max_distance <= 0.0 || radius <= 0.0 {
            return None;
        }

        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let shape_vel = vector![direction.x, direction.y, direction.z];
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            stop_at_penetration: true,
            ..Default::default()
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape_vel,
                &Ball::new(radius),
                options,
                filter,
            )
            .map(|(_handle, hit)| {
                let distance = hit.time_of_impact;
                let normal = Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z);
                RayHit {
                    distance,
                    point: origin + direction * distance,
                    normal: facing_normal(normal, direction),
                }
            })
    }

    /// A probe over this world that ignores one rigid body (usually the character).
    pub fn probe_excluding(&self, body: Option<RigidBodyHandle>) -> FilteredProbe<'_> {
        FilteredProbe { world: self, body }
    }

    /// Create an infinite ground plane at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a static box rotated about +Y by `yaw` radians
    pub fn create_static_box_rotated(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        yaw: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .rotation(vector![0.0, yaw, 0.0])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a static triangle-mesh collider from world-space geometry
    pub fn create_static_trimesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
    ) -> Result<ColliderHandle, PhysicsError> {
        if indices.is_empty() {
            return Err(PhysicsError::InvalidMesh("mesh has no triangles".into()));
        }
        if let Some(bad) = indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertices.len())
        {
            return Err(PhysicsError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }

        let points = vertices.iter().map(|v| point![v.x, v.y, v.z]).collect();
        let collider = ColliderBuilder::trimesh(points, indices.to_vec())
            .friction(0.7)
            .build();
        Ok(self.add_static_collider(collider))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionProbe for PhysicsWorld {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.raycast(origin, direction, max_distance, QueryFilter::default())
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.sphere_cast(origin, radius, direction, max_distance, QueryFilter::default())
    }
}

/// Probe over a [`PhysicsWorld`] that skips one rigid body's colliders.
pub struct FilteredProbe<'a> {
    world: &'a PhysicsWorld,
    body: Option<RigidBodyHandle>,
}

impl FilteredProbe<'_> {
    fn filter(&self) -> QueryFilter {
        match self.body {
            Some(body) => QueryFilter::default().exclude_rigid_body(body),
            None => QueryFilter::default(),
        }
    }
}

impl CollisionProbe for FilteredProbe<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.world
            .raycast(origin, direction, max_distance, self.filter())
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.world
            .sphere_cast(origin, radius, direction, max_distance, self.filter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_world_never_hits() {
        let world = PhysicsWorld::new();
        assert_eq!(world.collider_count(), 0);
        assert!(world.cast_ray(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y, 100.0).is_none());
    }

    #[test]
    fn test_ground_hit_reports_point_and_normal() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);

        let hit = world
            .cast_ray(Vec3::new(2.0, 10.0, -1.0), -Vec3::Y, 100.0)
            .expect("ground should be hit");
        assert!((hit.distance - 10.0).abs() < 1e-3);
        assert!((hit.point - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-3);
        let normal = hit.normal.expect("ground has a normal");
        assert!((normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_probe_respects_max_distance() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(0.5, 2.0, 5.0), Vec3::new(3.0, 0.0, 0.0));
        assert!(world.cast_ray(Vec3::ZERO, Vec3::X, 2.0).is_none());
        let hit = world.cast_ray(Vec3::ZERO, Vec3::X, 3.0).expect("wall in range");
        assert!((hit.distance - 2.5).abs() < 1e-3);
        assert!((hit.normal.expect("wall normal") + Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_sphere_cast_stops_a_radius_short_of_wall() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(0.5, 2.0, 5.0), Vec3::new(3.0, 0.0, 0.0));

        let hit = world
            .cast_sphere(Vec3::ZERO, 0.4, Vec3::X, 5.0)
            .expect("wall in range");
        assert!((hit.distance - 2.1).abs() < 1e-3, "{hit:?}");
        assert!((hit.normal.expect("wall normal") + Vec3::X).length() < 1e-3);

        // A ray along the same line would miss at this range; the ball does not
        assert!(world.cast_ray(Vec3::ZERO, Vec3::X, 2.2).is_none());
        assert!(world.cast_sphere(Vec3::ZERO, 0.4, Vec3::X, 2.2).is_some());
    }

    #[test]
    fn test_sphere_cast_grazing_wall_at_an_angle() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(0.1, 2.0, 20.0), Vec3::new(2.0, 0.0, 0.0));

        // Clearance to the face is 0.05 along a 45° path
        let direction = Vec3::new(1.0, 0.0, -1.0).normalize();
        let origin = Vec3::new(1.5, 0.0, 0.0);
        let hit = world
            .cast_sphere(origin, 0.35, direction, 1.0)
            .expect("grazing contact");
        let normal = hit.normal.expect("wall normal");
        assert!((normal + Vec3::X).length() < 1e-3, "{normal:?}");
        let center_x = origin.x + direction.x * hit.distance;
        assert!((center_x + 0.35 - 1.9).abs() < 1e-3, "{center_x}");
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        assert!(world.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn test_trimesh_floor() {
        let mut world = PhysicsWorld::new();
        let vertices = [
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, 5.0),
            Vec3::new(-5.0, 1.0, 5.0),
        ];
        let indices = [[0, 2, 1], [0, 3, 2]];
        world
            .create_static_trimesh(&vertices, &indices)
            .expect("valid mesh");

        let hit = world
            .cast_ray(Vec3::new(0.0, 4.0, 0.0), -Vec3::Y, 10.0)
            .expect("mesh hit");
        assert!((hit.point.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_trimesh_rejects_bad_indices() {
        let mut world = PhysicsWorld::new();
        let err = world
            .create_static_trimesh(&[Vec3::ZERO, Vec3::X, Vec3::Z], &[[0, 1, 7]])
            .unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidMesh(_)));
        assert_eq!(world.collider_count(), 0);
    }
}
