//! Controller errors

use stride_physics::PhysicsError;
use thiserror::Error;

/// Errors raised while setting up a controlled character.
///
/// Per-frame updates never fail; only attaching a character can.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("a character is already attached to this controller")]
    AlreadyAttached,

    #[error("physics backend error: {0}")]
    Physics(#[from] PhysicsError),
}
