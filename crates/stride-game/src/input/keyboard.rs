//! Keyboard bindings and held-key tracking

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use super::{Intent, IntentSource};

/// Controller actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Strafe left (A by default)
    MoveLeft,
    /// Strafe right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Sprint modifier (Shift by default)
    Sprint,
    /// Leave pointer capture (Escape by default)
    ReleasePointer,
}

/// Maps physical keys to actions
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, KeyAction::MoveForward);
        bindings.bind(KeyCode::KeyS, KeyAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, KeyAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, KeyAction::MoveRight);

        bindings.bind(KeyCode::ArrowUp, KeyAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, KeyAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, KeyAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, KeyAction::MoveRight);

        bindings.bind(KeyCode::Space, KeyAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, KeyAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, KeyAction::Sprint);
        bindings.bind(KeyCode::Escape, KeyAction::ReleasePointer);

        bindings
    }
}

impl KeyBindings {
    /// Bind a key to an action, replacing any previous binding for that key
    pub fn bind(&mut self, key: KeyCode, action: KeyAction) {
        self.bindings.insert(key, action);
    }

    /// Remove a key binding
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Get the action for a key, if any
    pub fn get(&self, key: KeyCode) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }
}

/// Tracks which bound keys are held. Actions are derived from the held
/// keys, so two keys bound to one action overlap cleanly.
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    /// Active bindings
    pub bindings: KeyBindings,
    held: HashSet<KeyCode>,
}

impl KeyboardInput {
    /// Create keyboard tracking with the given bindings
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
        }
    }

    /// Apply a key event. Returns the action if this was a fresh press.
    pub fn handle_key(
        &mut self,
        physical_key: PhysicalKey,
        state: ElementState,
    ) -> Option<KeyAction> {
        let PhysicalKey::Code(code) = physical_key else {
            return None;
        };
        let action = self.bindings.get(code)?;
        match state {
            ElementState::Pressed => {
                let already_active = self.is_held(action);
                (self.held.insert(code) && !already_active).then_some(action)
            }
            ElementState::Released => {
                self.held.remove(&code);
                None
            }
        }
    }

    /// Check if any key bound to an action is held
    pub fn is_held(&self, action: KeyAction) -> bool {
        self.held
            .iter()
            .any(|&code| self.bindings.get(code) == Some(action))
    }

    /// Forget every held key
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn axis(&self, negative: KeyAction, positive: KeyAction) -> f32 {
        let mut value = 0.0;
        if self.is_held(negative) {
            value -= 1.0;
        }
        if self.is_held(positive) {
            value += 1.0;
        }
        value
    }
}

impl IntentSource for KeyboardInput {
    fn contribute(&mut self, intent: &mut Intent, _dt: f32) {
        intent.movement.x += self.axis(KeyAction::MoveLeft, KeyAction::MoveRight);
        intent.movement.y += self.axis(KeyAction::MoveForward, KeyAction::MoveBackward);
        intent.sprint |= self.is_held(KeyAction::Sprint);
        intent.jump |= self.is_held(KeyAction::Jump);
    }
}
