/// Errors raised while building physics objects.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PhysicsError {
    #[error("invalid capsule: height {height} must exceed twice the radius {radius}")]
    InvalidCapsule { height: f32, radius: f32 },

    #[error("invalid triangle mesh: {0}")]
    InvalidMesh(String),

    #[error("rigid body no longer exists in the physics world")]
    MissingBody,
}
