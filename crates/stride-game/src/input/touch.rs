//! Multi-touch virtual sticks
//!
//! The left half of the surface is a movement stick, the right half a look
//! stick. Two simultaneous touches request a jump, three request sprint.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::TouchPhase;

use super::{InputConfig, Intent, IntentSource};

/// A stick anchored where the finger went down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualStick {
    touch: Option<u64>,
    origin: Vec2,
    value: Vec2,
}

impl VirtualStick {
    /// Current deflection, length at most 1
    pub fn value(&self) -> Vec2 {
        self.value
    }

    /// Whether a finger currently owns this stick
    pub fn is_held(&self) -> bool {
        self.touch.is_some()
    }

    fn owns(&self, id: u64) -> bool {
        self.touch == Some(id)
    }

    fn press(&mut self, id: u64, position: Vec2) {
        self.touch = Some(id);
        self.origin = position;
        self.value = Vec2::ZERO;
    }

    fn drag(&mut self, position: Vec2, radius: f32, dead_zone: f32) {
        let deflection = ((position - self.origin) / radius.max(1.0)).clamp_length_max(1.0);
        self.value = if deflection.length() < dead_zone {
            Vec2::ZERO
        } else {
            deflection
        };
    }

    fn lift(&mut self) {
        self.touch = None;
    }

    /// Recenter a released stick by `damping` once per frame
    fn settle(&mut self, damping: f32, dead_zone: f32) {
        if self.touch.is_some() {
            return;
        }
        self.value *= damping;
        if self.value.length() < dead_zone {
            self.value = Vec2::ZERO;
        }
    }
}

/// Both virtual sticks plus the finger-count gestures
#[derive(Debug, Clone)]
pub struct TouchSticks {
    /// Radius, dead zone, damping and look speed
    pub config: InputConfig,
    viewport: Vec2,
    move_stick: VirtualStick,
    look_stick: VirtualStick,
    active: HashSet<u64>,
}

impl TouchSticks {
    /// Create idle sticks for a default 1280x720 surface
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            viewport: Vec2::new(1280.0, 720.0),
            move_stick: VirtualStick::default(),
            look_stick: VirtualStick::default(),
            active: HashSet::new(),
        }
    }

    /// Surface size in pixels
    pub fn set_viewport(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.viewport = size;
        }
    }

    /// Number of fingers down
    pub fn active_touches(&self) -> usize {
        self.active.len()
    }

    /// The movement stick
    pub fn move_stick(&self) -> &VirtualStick {
        &self.move_stick
    }

    /// The look stick
    pub fn look_stick(&self) -> &VirtualStick {
        &self.look_stick
    }

    /// Apply one touch event
    pub fn handle_touch(&mut self, id: u64, position: Vec2, phase: TouchPhase) {
        match phase {
            TouchPhase::Started => {
                self.active.insert(id);
                let left_half = position.x < self.viewport.x * 0.5;
                if left_half && !self.move_stick.is_held() {
                    self.move_stick.press(id, position);
                } else if !left_half && !self.look_stick.is_held() {
                    self.look_stick.press(id, position);
                }
            }
            TouchPhase::Moved => {
                let (radius, dead_zone) = (self.config.stick_radius, self.config.dead_zone);
                if self.move_stick.owns(id) {
                    self.move_stick.drag(position, radius, dead_zone);
                } else if self.look_stick.owns(id) {
                    self.look_stick.drag(position, radius, dead_zone);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.active.remove(&id);
                if self.move_stick.owns(id) {
                    self.move_stick.lift();
                }
                if self.look_stick.owns(id) {
                    self.look_stick.lift();
                }
            }
        }
    }
}

impl IntentSource for TouchSticks {
    fn contribute(&mut self, intent: &mut Intent, dt: f32) {
        // Screen y grows downward, so dragging up already reads as forward (-1).
        intent.movement += self.move_stick.value();

        let look = self.look_stick.value() * self.config.touch_look_speed * dt;
        let y_mult = if self.config.invert_y { -1.0 } else { 1.0 };
        intent.look += Vec2::new(-look.x, -look.y * y_mult);

        match self.active.len() {
            2 => intent.jump = true,
            n if n >= 3 => intent.sprint = true,
            _ => {}
        }

        let damping = self.config.effective_damping();
        self.move_stick.settle(damping, self.config.dead_zone);
        self.look_stick.settle(damping, self.config.dead_zone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sticks() -> TouchSticks {
        let mut sticks = TouchSticks::new(InputConfig::default());
        sticks.set_viewport(Vec2::new(800.0, 600.0));
        sticks
    }

    fn sample(sticks: &mut TouchSticks) -> Intent {
        let mut intent = Intent::default();
        sticks.contribute(&mut intent, 1.0 / 60.0);
        intent
    }

    #[test]
    fn test_left_drag_up_moves_forward() {
        let mut sticks = sticks();
        sticks.handle_touch(1, Vec2::new(100.0, 400.0), TouchPhase::Started);
        sticks.handle_touch(1, Vec2::new(100.0, 340.0), TouchPhase::Moved);

        let intent = sample(&mut sticks);
        assert!((intent.movement.y + 1.0).abs() < 1e-5, "{:?}", intent.movement);
        assert_eq!(intent.movement.x, 0.0);
    }

    #[test]
    fn test_deflection_is_clamped_to_unit_length() {
        let mut sticks = sticks();
        sticks.handle_touch(1, Vec2::new(100.0, 400.0), TouchPhase::Started);
        sticks.handle_touch(1, Vec2::new(400.0, 100.0), TouchPhase::Moved);
        assert!(sticks.move_stick().value().length() <= 1.0 + 1e-5);
    }

    #[test]
    fn test_small_drag_is_dead_zoned() {
        let mut sticks = sticks();
        sticks.handle_touch(1, Vec2::new(100.0, 400.0), TouchPhase::Started);
        sticks.handle_touch(1, Vec2::new(103.0, 400.0), TouchPhase::Moved);
        assert_eq!(sticks.move_stick().value(), Vec2::ZERO);
    }

    #[test]
    fn test_released_stick_decays_geometrically() {
        let mut sticks = sticks();
        sticks.handle_touch(1, Vec2::new(100.0, 400.0), TouchPhase::Started);
        sticks.handle_touch(1, Vec2::new(160.0, 400.0), TouchPhase::Moved);
        sticks.handle_touch(1, Vec2::new(160.0, 400.0), TouchPhase::Ended);

        let first = sample(&mut sticks).movement.x;
        let second = sample(&mut sticks).movement.x;
        assert!((first - 1.0).abs() < 1e-5);
        assert!((second - 0.85).abs() < 1e-5, "{second}");

        // Eventually snaps to zero instead of decaying forever
        let mut frames = 0;
        while sticks.move_stick().value() != Vec2::ZERO {
            sample(&mut sticks);
            frames += 1;
            assert!(frames < 100);
        }
    }

    #[test]
    fn test_right_half_drives_look() {
        let mut sticks = sticks();
        sticks.handle_touch(7, Vec2::new(600.0, 300.0), TouchPhase::Started);
        sticks.handle_touch(7, Vec2::new(660.0, 300.0), TouchPhase::Moved);

        let intent = sample(&mut sticks);
        assert_eq!(intent.movement, Vec2::ZERO);
        assert!(intent.look.x < 0.0, "dragging right turns right");
    }

    #[test]
    fn test_finger_count_gestures() {
        let mut sticks = sticks();
        sticks.handle_touch(1, Vec2::new(100.0, 300.0), TouchPhase::Started);
        assert!(!sample(&mut sticks).jump);

        sticks.handle_touch(2, Vec2::new(600.0, 300.0), TouchPhase::Started);
        let two = sample(&mut sticks);
        assert!(two.jump && !two.sprint);

        sticks.handle_touch(3, Vec2::new(620.0, 300.0), TouchPhase::Started);
        let three = sample(&mut sticks);
        assert!(three.sprint && !three.jump);

        sticks.handle_touch(2, Vec2::ZERO, TouchPhase::Cancelled);
        sticks.handle_touch(3, Vec2::ZERO, TouchPhase::Ended);
        assert_eq!(sticks.active_touches(), 1);
    }
}
