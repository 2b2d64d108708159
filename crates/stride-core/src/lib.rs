//! Stride Core - Core types and utilities for the Stride character controller
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for placing the character rig
//! - Frame clock with delta-time clamping
//! - Frame-rate-independent easing

pub mod ease;
pub mod time;
pub mod types;

pub use ease::{blend_factor, ease_angle_toward, ease_toward};
pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use time::{ClockConfig, FrameClock};
pub use types::Transform;
