//! Stride - headless third-person controller harness
//!
//! Builds a small arena, drives the character controller with a scripted
//! input timeline at a fixed simulated frame rate, and logs what happens.
//!
//! Usage: `stride [kinematic|dynamics] [--write-settings]`

mod arena;
mod audio;
mod script;
mod settings;

use std::env;

use anyhow::{Context, Result};
use glam::Vec2;
use stride_core::{ClockConfig, FrameClock, Transform};
use stride_game::{
    CharacterController, CharacterRig, InputAggregator, MotionStrategy, SoundSink,
};
use stride_physics::PhysicsWorld;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use audio::KiraSink;
use script::ScriptPlayer;
use settings::Settings;

/// Stand-in for a loaded character model
#[derive(Debug, Default)]
struct HeadlessRig {
    transform: Transform,
    playback_rate: f32,
}

impl CharacterRig for HeadlessRig {
    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn play_clip(&mut self, name: &str) {
        debug!(clip = name, "Play clip");
    }

    fn stop_clip(&mut self, name: &str) {
        debug!(clip = name, "Stop clip");
    }

    fn set_playback_rate(&mut self, rate: f32) {
        if rate != self.playback_rate {
            debug!(rate, "Playback rate");
        }
        self.playback_rate = rate;
    }
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    jumps: u32,
    respawns: u32,
    grounded_frames: u64,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let path = Settings::settings_path();
    let loaded = path.as_deref().map(Settings::load_from);
    let mut settings = match &loaded {
        Some(Ok(Some(settings))) => settings.clone(),
        _ => Settings::default(),
    };

    let level = settings
        .simulation
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match (&path, loaded) {
        (None, _) => warn!("Could not determine config directory, using defaults"),
        (Some(_), Some(Ok(None))) => info!("No settings file found, using defaults"),
        (Some(path), Some(Ok(Some(_)))) => info!("Loaded settings from {:?}", path),
        (Some(_), Some(Err(e))) => warn!("{:#}, using defaults", e),
        (Some(_), None) => {}
    }

    for arg in &args {
        match arg.as_str() {
            "kinematic" => settings.simulation.strategy = MotionStrategy::Kinematic,
            "dynamics" => settings.simulation.strategy = MotionStrategy::Dynamics,
            "--write-settings" => {
                settings.save()?;
            }
            other => warn!("Ignoring unknown argument {:?}", other),
        }
    }

    info!("Starting Stride harness...");
    run(&settings)
}

fn run(settings: &Settings) -> Result<()> {
    let mut world = PhysicsWorld::new();
    arena::build(&mut world)?;

    let mut controller = CharacterController::new(
        settings.controller_config(),
        settings.camera_config(),
        settings.feedback.clone(),
    );
    controller
        .attach_character(Box::new(HeadlessRig::default()), arena::SPAWN, &mut world)
        .context("Failed to attach character")?;

    let mut input = InputAggregator::new(settings.input.clone());
    input.set_viewport(Vec2::new(1280.0, 720.0));
    let mut script = ScriptPlayer::new(script::default_timeline());

    let mut sound = if settings.audio.enabled {
        match KiraSink::new(&settings.audio) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!("Audio disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut clock = FrameClock::new(ClockConfig {
        time_scale: settings.simulation.time_scale,
        max_delta: controller.config.max_frame_delta,
    });
    let raw_dt = settings.simulation.frame_delta();
    let total_frames = (settings.simulation.duration / raw_dt).ceil() as u64;
    let report_interval = u64::from(settings.simulation.report_interval.max(1));
    let mut summary = RunSummary::default();

    info!(
        strategy = ?controller.strategy(),
        frames = total_frames,
        audio = sound.is_some(),
        "Running scripted timeline"
    );

    for _ in 0..total_frames {
        let dt = clock.tick(raw_dt);
        script.advance(clock.elapsed as f32, &mut input);
        let intent = input.sample(dt);

        let sink = sound.as_mut().map(|s| s as &mut dyn SoundSink);
        let Some(report) = controller.update(&intent, &mut world, sink, dt) else {
            break;
        };
        if let Some(sink) = sound.as_mut() {
            sink.end_frame(&report.camera);
        }

        summary.frames += 1;
        summary.jumps += u32::from(report.jumped);
        summary.grounded_frames += u64::from(report.grounded);
        if let Some(cause) = report.respawned {
            summary.respawns += 1;
            info!(?cause, frame = clock.frame_count, "Respawned");
        }
        if report.jumped {
            info!(position = ?report.position, "Jump");
        }
        if clock.frame_count % report_interval == 0 {
            let (sprinting, pitch) = controller
                .state()
                .map_or((false, 0.0), |s| (s.is_sprinting, s.pitch.to_degrees()));
            info!(
                elapsed = clock.elapsed,
                position = ?report.position,
                grounded = report.grounded,
                sprinting,
                pitch,
                fov = report.camera.fov,
                camera_distance = report.camera.distance,
                "Frame"
            );
        }
    }

    if let Some(sink) = sound.as_mut() {
        sink.stop();
    }
    controller.detach_character(&mut world);

    info!(
        frames = summary.frames,
        jumps = summary.jumps,
        respawns = summary.respawns,
        grounded_frames = summary.grounded_frames,
        scripted_events_done = script.is_finished(),
        "Run complete"
    );
    Ok(())
}
