//! Coyote time and jump buffering

use tracing::debug;

use super::{ControllerConfig, ControllerState};

/// Jump eligibility as two countdown timers.
///
/// A rising edge of the jump input arms the buffer; ground contact refreshes
/// the coyote window. A jump commits on the first frame both are positive,
/// and committing zeroes both, so one press yields at most one jump.
#[derive(Debug, Clone, Copy)]
pub struct JumpStateMachine {
    /// Coyote window (seconds)
    pub coyote_window: f32,
    /// Buffer window (seconds)
    pub buffer_window: f32,
}

impl JumpStateMachine {
    /// Create from controller tuning
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            coyote_window: config.coyote_time,
            buffer_window: config.jump_buffer,
        }
    }

    /// Advance both timers by `dt` and report whether a jump commits this frame.
    ///
    /// `state.grounded` must already reflect this frame's ground probe.
    pub fn update(&self, state: &mut ControllerState, jump_held: bool, dt: f32) -> bool {
        let pressed = jump_held && !state.jump_was_held;
        state.jump_was_held = jump_held;

        if pressed {
            state.jump_buffer_timer = self.buffer_window;
        } else {
            state.jump_buffer_timer -= dt;
        }

        if state.grounded {
            state.coyote_timer = self.coyote_window;
        } else {
            state.coyote_timer -= dt;
        }

        if state.jump_buffer_timer > 0.0 && state.coyote_timer > 0.0 {
            state.jump_buffer_timer = 0.0;
            state.coyote_timer = 0.0;
            debug!(position = ?state.position, "Jump committed");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (JumpStateMachine, ControllerState) {
        (
            JumpStateMachine::new(&ControllerConfig::default()),
            ControllerState::new(Vec3::ZERO, 75.0),
        )
    }

    #[test]
    fn test_grounded_press_commits_and_zeroes_timers() {
        let (jump, mut state) = setup();
        state.grounded = true;
        assert!(jump.update(&mut state, true, DT));
        assert_eq!(state.jump_buffer_timer, 0.0);
        assert_eq!(state.coyote_timer, 0.0);
    }

    #[test]
    fn test_holding_does_not_retrigger() {
        let (jump, mut state) = setup();
        state.grounded = true;
        assert!(jump.update(&mut state, true, DT));
        for _ in 0..30 {
            assert!(!jump.update(&mut state, true, DT));
        }
    }

    #[test]
    fn test_no_ground_no_jump() {
        let (jump, mut state) = setup();
        assert!(!jump.update(&mut state, true, DT));
        assert!(state.jump_buffer_timer > 0.0);
    }

    #[test]
    fn test_coyote_window() {
        let (jump, mut state) = setup();
        state.grounded = true;
        jump.update(&mut state, false, DT);

        // Walk off the ledge, press a few frames later
        state.grounded = false;
        for _ in 0..5 {
            assert!(!jump.update(&mut state, false, DT));
        }
        assert!(jump.update(&mut state, true, DT));
    }

    #[test]
    fn test_coyote_window_expires() {
        let (jump, mut state) = setup();
        state.grounded = true;
        jump.update(&mut state, false, DT);

        state.grounded = false;
        for _ in 0..12 {
            jump.update(&mut state, false, DT);
        }
        assert!(!jump.update(&mut state, true, DT));
    }

    #[test]
    fn test_buffered_press_fires_on_landing() {
        let (jump, mut state) = setup();
        assert!(!jump.update(&mut state, true, DT));
        for _ in 0..4 {
            assert!(!jump.update(&mut state, false, DT));
        }
        state.grounded = true;
        assert!(jump.update(&mut state, false, DT));
    }

    #[test]
    fn test_buffer_expires_before_landing() {
        let (jump, mut state) = setup();
        jump.update(&mut state, true, DT);
        for _ in 0..12 {
            jump.update(&mut state, false, DT);
        }
        state.grounded = true;
        assert!(!jump.update(&mut state, false, DT));
    }

    #[test]
    fn test_timers_only_decrease_between_refreshes() {
        let (jump, mut state) = setup();
        jump.update(&mut state, true, DT);
        let mut last = state.jump_buffer_timer;
        for _ in 0..20 {
            jump.update(&mut state, false, DT);
            assert!(state.jump_buffer_timer < last);
            last = state.jump_buffer_timer;
        }
    }
}
