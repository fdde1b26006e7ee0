// trackline_sim/src/simulation/config/mod.rs

//! Loading and validating scenario files.
//!
//! A scenario is a TOML file layered with `TRACKLINE_` environment overrides;
//! nested keys are separated by `__`, so `TRACKLINE_DRIVE__MAX_SPEED=120`
//! replaces `[drive] max_speed`.

pub mod structs;

use std::path::Path;

use bevy::log::info;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub use structs::{
    PartShape, ScenarioConfig, ScriptSegment, SimulationSection, TrackConfig, TrackPartConfig,
};

use crate::simulation::core::error::SimError;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TRACKLINE_";

/// Reads, layers and validates the scenario at `path`.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, SimError> {
    // figment treats a missing file as an empty one.
    if !path.is_file() {
        return Err(SimError::MissingScenario(path.to_path_buf()));
    }
    info!("Loading scenario from: {}", path.display());

    let config: ScenarioConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates a scenario held in memory. No environment layering.
pub fn parse_scenario(toml: &str) -> Result<ScenarioConfig, SimError> {
    let config: ScenarioConfig = Figment::new().merge(Toml::string(toml)).extract()?;
    config.validate()?;
    Ok(config)
}

/// The fully resolved scenario, defaults included, as TOML.
pub fn dump_scenario(config: &ScenarioConfig) -> Result<String, SimError> {
    Ok(toml::to_string_pretty(config)?)
}
