//! Test arena the headless run walks through

use anyhow::Context;
use glam::Vec3;
use stride_physics::PhysicsWorld;
use tracing::info;

/// Where the character starts
pub const SPAWN: Vec3 = Vec3::new(0.0, 0.05, 6.0);

/// Build the arena: a floor, boundary walls, an angled wall for sliding, a
/// raised ledge, and a triangle-mesh ramp up to the ledge.
pub fn build(world: &mut PhysicsWorld) -> anyhow::Result<()> {
    world.create_ground(0.0);

    // Boundary, 40 x 40
    for (half, center) in [
        (Vec3::new(20.0, 2.0, 0.5), Vec3::new(0.0, 2.0, -20.5)),
        (Vec3::new(20.0, 2.0, 0.5), Vec3::new(0.0, 2.0, 20.5)),
        (Vec3::new(0.5, 2.0, 20.0), Vec3::new(-20.5, 2.0, 0.0)),
        (Vec3::new(0.5, 2.0, 20.0), Vec3::new(20.5, 2.0, 0.0)),
    ] {
        world.create_static_box(half, center);
    }

    // Angled wall across the forward path
    world.create_static_box_rotated(
        Vec3::new(4.0, 2.0, 0.25),
        Vec3::new(2.0, 2.0, -4.0),
        30f32.to_radians(),
    );

    // Ledge, top at y = 1
    world.create_static_box(Vec3::new(3.0, 0.5, 3.0), Vec3::new(-10.0, 0.5, 0.0));

    // Ramp from the floor up to the ledge's east edge
    let vertices = [
        Vec3::new(-3.0, 0.0, -2.0),
        Vec3::new(-3.0, 0.0, 2.0),
        Vec3::new(-7.0, 1.0, 2.0),
        Vec3::new(-7.0, 1.0, -2.0),
    ];
    let indices = [[0, 2, 1], [0, 3, 2]];
    world
        .create_static_trimesh(&vertices, &indices)
        .context("Failed to build ramp collider")?;

    info!(colliders = world.collider_count(), "Arena built");
    Ok(())
}
