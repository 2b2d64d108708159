use serde::{Deserialize, Serialize};

/// Audio volume configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Master volume multiplier (0.0–1.0).
    pub master_volume: f64,
    /// One-shot effects (jump, landing) multiplier (0.0–1.0).
    pub sfx_volume: f64,
    /// Continuous loops (sprint/engine) multiplier (0.0–1.0).
    pub loop_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            loop_volume: 0.8,
        }
    }
}

impl AudioConfig {
    /// Effective one-shot volume (master * sfx).
    pub fn effective_sfx_volume(&self) -> f64 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective loop volume (master * loop).
    pub fn effective_loop_volume(&self) -> f64 {
        (self.master_volume * self.loop_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volumes() {
        let config = AudioConfig::default();
        assert_eq!(config.effective_sfx_volume(), 1.0);
        assert!((config.effective_loop_volume() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn effective_volumes_are_clamped() {
        let config = AudioConfig {
            master_volume: 2.0,
            sfx_volume: 1.0,
            loop_volume: 0.25,
        };
        assert_eq!(config.effective_sfx_volume(), 1.0);
        assert!((config.effective_loop_volume() - 0.5).abs() < f64::EPSILON);
    }
}
