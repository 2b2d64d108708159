//! Harness settings with persistence
//!
//! Settings are saved to `~/.config/stride/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use stride_audio::AudioConfig;
use stride_game::{
    CameraConfig, ControllerConfig, FeedbackConfig, InputConfig, MotionStrategy,
};
use tracing::info;

/// All harness settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationSettings,
    /// Overrides the strategy's reference tuning when present
    pub controller: Option<ControllerConfig>,
    /// Overrides the strategy's reference camera when present
    pub camera: Option<CameraConfig>,
    pub input: InputConfig,
    pub feedback: FeedbackConfig,
    pub audio: AudioSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Read settings from `path`. `Ok(None)` means the file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(settings))
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }

    /// Controller tuning: the override, or the reference tuning for the strategy
    pub fn controller_config(&self) -> ControllerConfig {
        let strategy = self.simulation.strategy;
        match &self.controller {
            Some(config) => ControllerConfig {
                strategy,
                ..config.clone()
            },
            None => ControllerConfig::for_strategy(strategy),
        }
    }

    /// Camera tuning: the override, or the reference camera for the strategy
    pub fn camera_config(&self) -> CameraConfig {
        self.camera
            .clone()
            .unwrap_or_else(|| CameraConfig::for_strategy(self.simulation.strategy))
    }
}

/// How the headless run is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Integrator to run
    pub strategy: MotionStrategy,
    /// Simulated seconds
    pub duration: f32,
    /// Simulated frame rate
    pub frame_rate: f32,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log a frame report every this many frames
    pub report_interval: u32,
    /// Time scale handed to the frame clock
    pub time_scale: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            strategy: MotionStrategy::Kinematic,
            duration: 12.0,
            frame_rate: 60.0,
            log_level: "info".into(),
            report_interval: 30,
            time_scale: 1.0,
        }
    }
}

impl SimulationSettings {
    /// Raw delta of one simulated frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.frame_rate.max(1.0)
    }
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Open an output device and play the cues
    pub enabled: bool,
    /// One-shot played on every jump
    pub jump_clip: PathBuf,
    /// Loop whose volume follows sprinting
    pub sprint_loop_clip: PathBuf,
    /// Volume mix
    pub volumes: AudioConfig,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            jump_clip: PathBuf::from("assets/audio/jump.ogg"),
            sprint_loop_clip: PathBuf::from("assets/audio/sprint_loop.ogg"),
            volumes: AudioConfig::default(),
        }
    }
}
