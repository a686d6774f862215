//! Windowed entry point: loads configuration, restores the session and
//! opens the render window.

use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use roamer::{init_logging, PresentationPlugin, SimConfig, SimulationPlugin};

/// An open-world sandbox with drivable vehicles
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML file layered over the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Where the session is restored from and saved to
    #[arg(long, default_value = "roamer-save.json")]
    save: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = SimConfig::load(args.config.as_deref()).context("loading configuration")?;

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Roamer".to_owned(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(SimulationPlugin::new(config).with_save(args.save))
        .add_plugins(PresentationPlugin)
        .run();
    if let AppExit::Error(code) = exit {
        anyhow::bail!("roamer exited with code {code}");
    }
    Ok(())
}
