// trackline_sim/src/simulation/core/simulation_setup.rs

use std::time::Duration;

use bevy::time::TimeUpdateStrategy;

use crate::prelude::*;
use crate::simulation::core::app_state::SimulationSet;
use crate::simulation::core::prng::SimulationRng;

/// Reads the scenario and sets up the clock, the RNG and the per-tick system
/// ordering every other plugin relies on.
pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // A plugin added without a scenario runs the defaults.
        if !app.world().contains_resource::<ScenarioConfig>() {
            warn!("No ScenarioConfig resource found, using defaults.");
            app.insert_resource(ScenarioConfig::default());
        }
        let config = app.world().resource::<ScenarioConfig>();
        let tick_hz = config.simulation.tick_hz;
        let seed = config.simulation.seed;

        // --- 1. Add the Deterministic PRNG Resource ---
        app.insert_resource(SimulationRng::from_seed(seed));

        // --- 2. Fixed tick, with time advancing one tick per app update ---
        // Headless runs go as fast as the machine allows and stay
        // deterministic regardless of wall-clock jitter.
        let timestep = Duration::from_secs_f64(1.0 / tick_hz);
        app.insert_resource(Time::<Fixed>::from_duration(timestep))
            .insert_resource(TimeUpdateStrategy::ManualDuration(timestep));

        // --- 3. Per-tick ordering ---
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Input,
                SimulationSet::Drive,
                SimulationSet::Telemetry,
            )
                .chain(),
        );

        info!("Simulation clock: {:.1} Hz, seed {}", tick_hz, seed);
    }
}
