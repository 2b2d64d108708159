//! Pointer-lock mouse look

use glam::Vec2;
use tracing::debug;
use winit::event::{ElementState, MouseButton};

use super::{InputConfig, Intent, IntentSource};

/// Mouse look that only reads motion while an exclusive capture is engaged.
///
/// Capture engages on the first primary click (or touch) and stays until
/// [`PointerLook::release`].
#[derive(Debug, Clone)]
pub struct PointerLook {
    /// Sensitivity and inversion
    pub config: InputConfig,
    captured: bool,
    pending: Vec2,
}

impl PointerLook {
    /// Create uncaptured pointer look
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            captured: false,
            pending: Vec2::ZERO,
        }
    }

    /// Engage capture
    pub fn capture(&mut self) {
        if !self.captured {
            debug!("Pointer captured");
        }
        self.captured = true;
    }

    /// Leave capture and drop unread motion
    pub fn release(&mut self) {
        self.captured = false;
        self.pending = Vec2::ZERO;
    }

    /// Whether motion is being read
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Handle a mouse button; a primary press engages capture
    pub fn handle_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && state == ElementState::Pressed {
            self.capture();
        }
    }

    /// Accumulate raw motion (pixels) while captured
    pub fn handle_motion(&mut self, delta: (f64, f64)) {
        if !self.captured {
            return;
        }
        let y_mult = if self.config.invert_y { -1.0 } else { 1.0 };
        // Moving right turns right (yaw decreases); moving up looks up.
        self.pending += Vec2::new(
            -(delta.0 as f32) * self.config.mouse_sensitivity,
            -(delta.1 as f32) * self.config.mouse_sensitivity * y_mult,
        );
    }
}

impl IntentSource for PointerLook {
    fn contribute(&mut self, intent: &mut Intent, _dt: f32) {
        intent.look += self.pending;
        self.pending = Vec2::ZERO;
    }
}
