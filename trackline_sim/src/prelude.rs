// trackline_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the pure pipeline types.
pub use trackline_core::prelude::*;

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::core::app_state::SimulationSet;
pub use crate::simulation::core::error::SimError;
pub use crate::simulation::plugins::script::{DriverInput, ScriptTimeline};
pub use crate::simulation::plugins::telemetry::Telemetry;
pub use crate::simulation::plugins::track::TrackCollider;
pub use crate::simulation::plugins::vehicle::LastFrame;
