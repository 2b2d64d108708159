//! Input aggregation
//!
//! Keyboard, pointer-lock mouse look and multi-touch virtual sticks are
//! each an [`IntentSource`]. The [`InputAggregator`] folds them into one
//! [`Intent`] per frame, so the controller never sees raw events.

mod keyboard;
mod pointer;
mod touch;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use winit::event::{ElementState, MouseButton, TouchPhase};
use winit::keyboard::PhysicalKey;

pub use keyboard::{KeyAction, KeyBindings, KeyboardInput};
pub use pointer::PointerLook;
pub use touch::{TouchSticks, VirtualStick};

/// What the player wants this frame, in character-local axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// `x` = strafe (right positive), `y` = forward axis where the forward
    /// key yields `-1`. Length never exceeds 1 after sampling.
    pub movement: Vec2,
    /// Look deltas in radians: `x` is added to yaw, `y` to pitch.
    pub look: Vec2,
    /// Sprint modifier held
    pub sprint: bool,
    /// Jump input held this frame (edges are detected downstream)
    pub jump: bool,
}

impl Intent {
    /// Whether the movement axes are deflected at all
    pub fn is_moving(&self) -> bool {
        self.movement.length_squared() > 1e-6
    }
}

/// Anything that can add to the per-frame intent (keyboard, touch, a
/// gamepad, a scripted test driver).
pub trait IntentSource {
    /// Add this source's contribution. Called once per frame.
    fn contribute(&mut self, intent: &mut Intent, dt: f32);
}

/// Input tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse look sensitivity (radians per pixel)
    pub mouse_sensitivity: f32,
    /// Full-deflection look speed of the right touch stick (radians/s)
    pub touch_look_speed: f32,
    /// Drag distance in pixels that maps to full stick deflection
    pub stick_radius: f32,
    /// Stick deflection below this magnitude reads as zero
    pub dead_zone: f32,
    /// Per-frame multiplier pulling a released stick back to center (< 1)
    pub stick_damping: f32,
    /// Invert vertical look
    pub invert_y: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            touch_look_speed: 2.5,
            stick_radius: 60.0,
            dead_zone: 0.1,
            stick_damping: 0.85,
            invert_y: false,
        }
    }
}

impl InputConfig {
    /// Damping factor forced into `[0, 0.99]` so released sticks always recenter
    pub fn effective_damping(&self) -> f32 {
        if self.stick_damping.is_finite() {
            self.stick_damping.clamp(0.0, 0.99)
        } else {
            0.0
        }
    }
}

/// Collects raw events from every input surface and produces one
/// [`Intent`] per frame.
pub struct InputAggregator {
    keyboard: KeyboardInput,
    pointer: PointerLook,
    touch: TouchSticks,
    extra: Vec<Box<dyn IntentSource>>,
}

impl Default for InputAggregator {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputAggregator {
    /// Create an aggregator with default key bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            keyboard: KeyboardInput::new(KeyBindings::default()),
            pointer: PointerLook::new(config.clone()),
            touch: TouchSticks::new(config),
            extra: Vec::new(),
        }
    }

    /// Replace the input tuning
    pub fn set_config(&mut self, config: InputConfig) {
        self.pointer.config = config.clone();
        self.touch.config = config;
    }

    /// Replace the key bindings
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.keyboard.bindings = bindings;
    }

    /// Register an additional source (e.g. a gamepad)
    pub fn add_source(&mut self, source: Box<dyn IntentSource>) {
        self.extra.push(source);
    }

    /// Size of the touch surface in pixels, used to split the two sticks
    pub fn set_viewport(&mut self, size: Vec2) {
        self.touch.set_viewport(size);
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, state: ElementState) {
        if let Some(KeyAction::ReleasePointer) = self.keyboard.handle_key(physical_key, state) {
            self.release_pointer();
        }
    }

    /// Handle a mouse button event. The first primary click engages look capture.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.pointer.handle_button(button, state);
    }

    /// Handle raw mouse motion (pixels)
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        self.pointer.handle_motion(delta);
    }

    /// Handle a touch event. The first touch engages capture like a click.
    pub fn handle_touch(&mut self, id: u64, position: Vec2, phase: TouchPhase) {
        if phase == TouchPhase::Started {
            self.pointer.capture();
        }
        self.touch.handle_touch(id, position, phase);
    }

    /// Drop pointer capture and forget held keys (Escape, focus loss)
    pub fn release_pointer(&mut self) {
        if self.pointer.is_captured() {
            debug!("Pointer capture released");
        }
        self.pointer.release();
        self.keyboard.clear();
    }

    /// Whether mouse look is currently active
    pub fn is_pointer_captured(&self) -> bool {
        self.pointer.is_captured()
    }

    /// Fold every source into this frame's intent and clear per-frame deltas
    pub fn sample(&mut self, dt: f32) -> Intent {
        let mut intent = Intent::default();

        self.keyboard.contribute(&mut intent, dt);
        self.pointer.contribute(&mut intent, dt);
        self.touch.contribute(&mut intent, dt);
        for source in &mut self.extra {
            source.contribute(&mut intent, dt);
        }

        intent.movement = if intent.movement.is_finite() {
            intent.movement.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        if !intent.look.is_finite() {
            intent.look = Vec2::ZERO;
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::*;

    struct ConstantSource(Vec2);

    impl IntentSource for ConstantSource {
        fn contribute(&mut self, intent: &mut Intent, _dt: f32) {
            intent.movement += self.0;
        }
    }

    #[test]
    fn test_forward_key_is_negative_forward_axis() {
        let mut input = InputAggregator::default();
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        let intent = input.sample(1.0 / 60.0);
        assert_eq!(intent.movement, Vec2::new(0.0, -1.0));
        assert!(intent.is_moving());
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut input = InputAggregator::default();
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyD), ElementState::Pressed);
        let intent = input.sample(1.0 / 60.0);
        assert!((intent.movement.length() - 1.0).abs() < 1e-5);
        assert!(intent.movement.x > 0.0 && intent.movement.y < 0.0);
    }

    #[test]
    fn test_mouse_look_requires_capture() {
        let mut input = InputAggregator::default();
        input.handle_mouse_motion((100.0, 0.0));
        assert_eq!(input.sample(1.0 / 60.0).look, Vec2::ZERO);

        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_pointer_captured());
        input.handle_mouse_motion((100.0, 0.0));
        let look = input.sample(1.0 / 60.0).look;
        assert!((look.x + 0.2).abs() < 1e-5, "{look:?}");

        // Deltas are consumed by sampling
        assert_eq!(input.sample(1.0 / 60.0).look, Vec2::ZERO);
    }

    #[test]
    fn test_escape_releases_pointer_and_held_keys() {
        let mut input = InputAggregator::default();
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        input.handle_keyboard(PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed);

        assert!(!input.is_pointer_captured());
        assert!(!input.sample(1.0 / 60.0).is_moving());
    }

    #[test]
    fn test_extra_sources_are_clamped_with_the_rest() {
        let mut input = InputAggregator::default();
        input.add_source(Box::new(ConstantSource(Vec2::new(3.0, 0.0))));
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyD), ElementState::Pressed);
        let intent = input.sample(1.0 / 60.0);
        assert_eq!(intent.movement, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_replacing_config_and_bindings() {
        let mut input = InputAggregator::default();
        input.set_config(InputConfig {
            mouse_sensitivity: 0.01,
            ..Default::default()
        });
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.handle_mouse_motion((100.0, 0.0));
        let look = input.sample(1.0 / 60.0).look;
        assert!((look.x + 1.0).abs() < 1e-5, "{look:?}");

        let mut bindings = KeyBindings::default();
        bindings.unbind(KeyCode::KeyW);
        bindings.bind(KeyCode::KeyI, KeyAction::MoveForward);
        input.set_bindings(bindings);
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        assert!(!input.sample(1.0 / 60.0).is_moving());
        input.handle_keyboard(PhysicalKey::Code(KeyCode::KeyI), ElementState::Pressed);
        assert_eq!(input.sample(1.0 / 60.0).movement, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_damping_is_kept_below_one() {
        let config = InputConfig {
            stick_damping: 1.5,
            ..Default::default()
        };
        assert!(config.effective_damping() < 1.0);
    }
}
