// trackline_sim/src/simulation/core/app_state.rs

use bevy::ecs::schedule::SystemSet;

/// Per-tick ordering inside `FixedUpdate`. Chained in this order by
/// `SimulationSetupPlugin`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Work out which controls are held this tick.
    Input,
    /// Run the vehicle pipeline and write its pose back to the entity.
    Drive,
    /// Record and report what the tick produced; stop the run when done.
    Telemetry,
}
