// trackline_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::script::ScriptPlugin;
use crate::simulation::plugins::telemetry::TelemetryPlugin;
use crate::simulation::plugins::track::TrackPlugin;
use crate::simulation::plugins::vehicle::VehiclePlugin;

// This prelude is for convenience for other files WITHIN the trackline_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// Everything a run needs on top of Bevy's minimal plugins. Insert the
/// `ScenarioConfig` resource before adding this.
pub struct TracklineSimulationPlugin;

impl Plugin for TracklineSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Clock, RNG, and system ordering. Must come first.
            SimulationSetupPlugin,
            // Static collider built from the generated track.
            TrackPlugin,
            // Scripted controls.
            ScriptPlugin,
            // The vehicle pipeline itself.
            VehiclePlugin,
            // Totals, reports, and the stop condition.
            TelemetryPlugin,
        ));
    }
}
