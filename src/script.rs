//! Scripted input timeline
//!
//! Feeds raw winit-shaped events into the input aggregator at fixed
//! simulated times, so the whole input path runs without a window.

use glam::Vec2;
use stride_game::InputAggregator;
use winit::event::{ElementState, MouseButton, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

/// One raw input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    Press(KeyCode),
    Release(KeyCode),
    Click,
    MouseMove(f64, f64),
    Touch(u64, Vec2, TouchPhase),
}

/// An action scheduled at a simulated time (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    pub at: f32,
    pub action: ScriptAction,
}

/// Walk forward into the angled wall, turn, sprint and jump, strafe, drive
/// the touch stick with a two-finger hop, then release the pointer.
pub fn default_timeline() -> Vec<ScriptEvent> {
    use ScriptAction::*;

    let events = [
        (0.2, Click),
        (0.5, Press(KeyCode::KeyW)),
        (2.5, MouseMove(-120.0, 40.0)),
        (3.0, Press(KeyCode::ShiftLeft)),
        (4.0, Press(KeyCode::Space)),
        (4.1, Release(KeyCode::Space)),
        (5.5, Release(KeyCode::ShiftLeft)),
        (5.6, MouseMove(600.0, -40.0)),
        (6.5, Press(KeyCode::KeyA)),
        (7.5, Release(KeyCode::KeyA)),
        (7.5, Release(KeyCode::KeyW)),
        (8.0, Touch(1, Vec2::new(200.0, 500.0), TouchPhase::Started)),
        (8.1, Touch(1, Vec2::new(200.0, 440.0), TouchPhase::Moved)),
        (8.5, Touch(2, Vec2::new(900.0, 300.0), TouchPhase::Started)),
        (8.6, Touch(2, Vec2::new(900.0, 300.0), TouchPhase::Ended)),
        (9.5, Touch(1, Vec2::new(200.0, 440.0), TouchPhase::Ended)),
        (10.0, Press(KeyCode::Escape)),
    ];

    events
        .into_iter()
        .map(|(at, action)| ScriptEvent { at, action })
        .collect()
}

/// Plays a timeline into an aggregator
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    events: Vec<ScriptEvent>,
    next: usize,
}

impl ScriptPlayer {
    /// Create a player; events are sorted by time
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, next: 0 }
    }

    /// Deliver every event due at or before `elapsed`. Returns how many fired.
    pub fn advance(&mut self, elapsed: f32, input: &mut InputAggregator) -> usize {
        let start = self.next;
        while let Some(event) = self.events.get(self.next) {
            if event.at > elapsed {
                break;
            }
            deliver(event.action, input);
            self.next += 1;
        }
        self.next - start
    }

    /// Whether every event has fired
    pub fn is_finished(&self) -> bool {
        self.next >= self.events.len()
    }
}

fn deliver(action: ScriptAction, input: &mut InputAggregator) {
    match action {
        ScriptAction::Press(key) => {
            input.handle_keyboard(PhysicalKey::Code(key), ElementState::Pressed)
        }
        ScriptAction::Release(key) => {
            input.handle_keyboard(PhysicalKey::Code(key), ElementState::Released)
        }
        ScriptAction::Click => input.handle_mouse_button(MouseButton::Left, ElementState::Pressed),
        ScriptAction::MouseMove(dx, dy) => input.handle_mouse_motion((dx, dy)),
        ScriptAction::Touch(id, position, phase) => input.handle_touch(id, position, phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_time_order() {
        let mut input = InputAggregator::default();
        let mut player = ScriptPlayer::new(vec![
            ScriptEvent {
                at: 1.0,
                action: ScriptAction::Press(KeyCode::KeyW),
            },
            ScriptEvent {
                at: 0.5,
                action: ScriptAction::Click,
            },
        ]);

        assert_eq!(player.advance(0.4, &mut input), 0);
        assert_eq!(player.advance(0.6, &mut input), 1);
        assert!(input.is_pointer_captured());
        assert!(!input.sample(0.016).is_moving());

        assert_eq!(player.advance(2.0, &mut input), 1);
        assert!(input.sample(0.016).is_moving());
        assert!(player.is_finished());
    }

    #[test]
    fn test_default_timeline_ends_by_releasing_pointer() {
        let mut input = InputAggregator::default();
        let mut player = ScriptPlayer::new(default_timeline());
        player.advance(f32::MAX, &mut input);
        assert!(player.is_finished());
        assert!(!input.is_pointer_captured());
    }
}
