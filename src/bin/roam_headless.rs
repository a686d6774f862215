//! Headless simulation harness.
//! Usage: `cargo run --bin roam_headless -- --script drive --frames 600`
//!
//! Runs the simulation without a window and logs a summary, which is handy
//! for checking tuning changes and day/night timing from a terminal.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use roamer::{
    init_logging, EventSink, FrameInput, HudSink, HudSnapshot, MoveFlags, SaveState,
    SceneRenderer, SimConfig, Simulation, WorldEvent,
};

/// Scripted input played back each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// No input at all.
    Idle,
    /// Walk forward the whole time.
    Walk,
    /// Enter the nearest vehicle and hold the throttle.
    Drive,
}

impl Script {
    const fn input(self, frame: u64) -> FrameInput {
        match self {
            Self::Idle => FrameInput::moving(MoveFlags {
                forward: false,
                back: false,
                left: false,
                right: false,
            }),
            Self::Walk => FrameInput::moving(MoveFlags::forward()),
            Self::Drive if frame == 0 => FrameInput::interact(),
            Self::Drive => FrameInput::moving(MoveFlags::forward()),
        }
    }
}

/// Run the simulation headlessly
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u16,
    /// Input script to play back
    #[arg(long, value_enum, default_value_t = Script::Idle)]
    script: Script,
    /// TOML file layered over the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Optional save file to restore from and write on completion
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Tally {
    nights: u32,
    walked: f32,
    other: u32,
}

impl EventSink for Tally {
    fn dispatch(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::NightReached => self.nights += 1,
            WorldEvent::Walked { distance } => self.walked += distance,
            other => {
                debug!("event: {other:?}");
                self.other += 1;
            }
        }
    }
}

#[derive(Debug, Default)]
struct LastHud(HudSnapshot);

impl HudSink for LastHud {
    fn present(&mut self, hud: &HudSnapshot) {
        self.0.clone_from(hud);
    }
}

#[derive(Debug, Default)]
struct FrameCounter(u64);

impl SceneRenderer for FrameCounter {
    fn render(&mut self, _frame: &roamer::FrameSnapshot) {
        self.0 += 1;
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = SimConfig::load(args.config.as_deref()).context("loading configuration")?;
    let mut sim = Simulation::new(&config).context("building world")?;
    if let Some(path) = &args.save {
        if let Some(state) = SaveState::load(path).context("reading save")? {
            state.apply(&mut sim);
        }
    }

    let dt = f32::from(args.dt_ms) / 1000.0;
    let mut tally = Tally::default();
    let mut hud = LastHud::default();
    let mut rendered = FrameCounter::default();
    info!(
        "running {} frames of {:?} at {}ms",
        args.frames, args.script, args.dt_ms
    );
    for frame in 0..args.frames {
        let mut out = roamer::Collaborators {
            events: &mut tally,
            hud: &mut hud,
            renderer: &mut rendered,
        };
        sim.tick(dt, &args.script.input(frame), &mut out);
    }

    let world = sim.world();
    info!(
        "rendered {} frames, t={:.2}s, phase {:.3} ({})",
        rendered.0,
        world.clock.elapsed(),
        world.clock.phase(),
        hud.0.time_of_day.label()
    );
    info!(
        "actor at {:?}, control {:?}, speed {}",
        world.actor.position, world.control, hud.0.speed
    );
    info!(
        "nights reached: {}, walked: {:.1}, other events: {}",
        tally.nights, tally.walked, tally.other
    );

    if let Some(path) = &args.save {
        SaveState::capture(&sim)
            .store(path)
            .context("writing save")?;
    }
    Ok(())
}
