// trackline_sim/src/simulation/core/error.rs

use std::path::PathBuf;

use thiserror::Error;
use trackline_core::error::{ConfigError, ControlParseError, GeometryError};

/// Everything that can stop a scenario from starting. Once the simulation is
/// running no tick can fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file not found: {0}")]
    MissingScenario(PathBuf),

    #[error("failed to load scenario: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid vehicle parameters: {0}")]
    InvalidParams(#[from] ConfigError),

    #[error("`{name}` is out of range: {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("track has no triangles")]
    EmptyTrack,

    #[error("bad track geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("bad script: {0}")]
    Control(#[from] ControlParseError),

    #[error("failed to render scenario as TOML: {0}")]
    Dump(#[from] toml::ser::Error),
}
