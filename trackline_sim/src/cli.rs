// trackline_sim/src/cli.rs

use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

/// Default log filter: our crates chatty, everything else quiet.
pub const DEFAULT_LOG_FILTER: &str = "info,trackline_sim=debug,trackline_core=info";

/// Trackline: drives a terrain-following vehicle along a scripted route.
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/hill_climb.toml")]
    pub scenario: PathBuf,

    /// Override the scenario's run length, in simulated seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Log filter in `tracing` directive syntax.
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,

    /// Print the fully resolved scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub dump_config: bool,
}
