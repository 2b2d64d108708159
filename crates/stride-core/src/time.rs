//! Frame clock for the simulation loop
//!
//! Turns raw wall-clock deltas into the clamped, scaled delta the controller
//! consumes. A stall (backgrounded window, debugger breakpoint) must never
//! reach the integrator as one huge step.

use serde::{Deserialize, Serialize};

/// Configuration for the frame clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Largest delta ever handed to the simulation, in seconds
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta: 0.1,
        }
    }
}

/// Per-frame time tracking
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Configuration
    pub config: ClockConfig,
    /// Simulated time since start in seconds
    pub elapsed: f64,
    /// Delta for this frame (clamped and scaled)
    pub delta: f32,
    /// Raw delta as reported by the host, before clamping
    pub raw_delta: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
}

impl FrameClock {
    /// Create a new clock with custom config
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance by the raw delta measured since the previous frame and
    /// return the delta the simulation should use.
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        self.raw_delta = raw_delta;
        self.frame_count += 1;

        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }

        self.delta = clamp_delta(raw_delta, self.config.max_delta) * self.config.time_scale;
        self.elapsed += self.delta as f64;
        self.delta
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

/// Clamp a raw frame delta into `[0, max_delta]`.
///
/// Negative and non-finite deltas (clock skew, first frame) collapse to zero.
pub fn clamp_delta(raw_delta: f32, max_delta: f32) -> f32 {
    if !raw_delta.is_finite() {
        return 0.0;
    }
    raw_delta.clamp(0.0, max_delta.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::default();
        let dt = clock.tick(3.0);
        assert_eq!(dt, 0.1);
        assert_eq!(clock.raw_delta, 3.0);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_pause_and_scale() {
        let mut clock = FrameClock::default();
        clock.pause();
        assert_eq!(clock.tick(0.016), 0.0);

        clock.resume();
        clock.set_time_scale(0.5);
        assert!((clock.tick(0.02) - 0.01).abs() < 1e-6);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn test_bad_deltas_collapse_to_zero() {
        assert_eq!(clamp_delta(-0.5, 0.1), 0.0);
        assert_eq!(clamp_delta(f32::NAN, 0.1), 0.0);
        assert_eq!(clamp_delta(f32::INFINITY, 0.1), 0.0);
    }
}
