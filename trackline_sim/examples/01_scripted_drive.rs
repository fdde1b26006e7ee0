// trackline_sim/examples/01_scripted_drive.rs

//! Headless scripted drive over a generated track.
//!
//! Loads a scenario, runs the vehicle pipeline at the scenario's tick rate as
//! fast as the machine allows, and logs the vehicle state periodically.
//!
//! To run this example:
//! `cargo run --example 01_scripted_drive -- --scenario assets/scenarios/hill_climb.toml`

use std::time::Duration;

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use clap::Parser;

use trackline_sim::cli::Cli;
use trackline_sim::simulation::config::{dump_scenario, load_scenario};
use trackline_sim::simulation::core::error::SimError;
use trackline_sim::TracklineSimulationPlugin;

fn main() -> AppExit {
    let cli = Cli::parse();

    let mut app = App::new();

    // --- 1. Core Bevy Plugins ---
    // No window or renderer; the schedule runner loops without sleeping.
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
        LogPlugin {
            level: bevy::log::Level::INFO,
            filter: cli.log_level.clone(),
            ..default()
        },
    ));

    // --- 2. Load Simulation Configuration ---
    let config = match load_with_overrides(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return AppExit::error();
        }
    };

    if cli.dump_config {
        return match dump_scenario(&config) {
            Ok(text) => {
                println!("{text}");
                AppExit::Success
            }
            Err(e) => {
                error!("{}", e);
                AppExit::error()
            }
        };
    }

    // --- 3. Add the Simulation ---
    app.insert_resource(config)
        .insert_resource(cli)
        .add_plugins(TracklineSimulationPlugin);

    // --- 4. Run the App ---
    info!("Starting Trackline simulation...");
    app.run()
}

fn load_with_overrides(cli: &Cli) -> Result<trackline_sim::prelude::ScenarioConfig, SimError> {
    let mut config = load_scenario(&cli.scenario)?;
    if let Some(duration) = cli.duration {
        config.simulation.duration_seconds = duration;
        config.validate()?;
    }
    Ok(config)
}
