// trackline_sim/src/simulation/plugins/telemetry.rs

//! Running totals for a headless run, periodic state reports, and the stop
//! condition.

use bevy::prelude::*;
use trackline_core::types::Point;
use trackline_core::vehicle::FrameOutput;

use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::app_state::SimulationSet;
use crate::simulation::plugins::vehicle::LastFrame;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub ticks: u64,
    /// Simulated seconds, summed from the clamped deltas the pipeline used.
    pub elapsed_seconds: f64,
    /// Path length travelled, including vertical moves.
    pub distance: f64,
    /// Ticks on which no probe found ground.
    pub airborne_ticks: u64,
    pub top_speed: f64,
    pub last: Option<FrameOutput>,
}

impl Telemetry {
    pub fn record(&mut self, frame: &FrameOutput) {
        let previous: Option<Point> = self.last.map(|f| f.position);
        if let Some(previous) = previous {
            self.distance += (frame.position - previous).norm();
        }
        self.ticks += 1;
        self.elapsed_seconds += frame.dt;
        if frame.valid_samples == 0 {
            self.airborne_ticks += 1;
        }
        self.top_speed = self.top_speed.max(frame.speed.abs());
        self.last = Some(*frame);
    }
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Telemetry>().add_systems(
            FixedUpdate,
            (record_telemetry, stop_when_done)
                .chain()
                .in_set(SimulationSet::Telemetry),
        );
    }
}

fn record_telemetry(
    config: Res<ScenarioConfig>,
    mut telemetry: ResMut<Telemetry>,
    frames: Query<&LastFrame>,
) {
    for frame in frames.iter().filter_map(|f| f.0.as_ref()) {
        telemetry.record(frame);

        let every = config.simulation.log_every_n_ticks as u64;
        if every > 0 && telemetry.ticks % every == 0 {
            info!(
                "t={:>6.2}s pos=({:.1}, {:.1}, {:.2}) heading={:.1} speed={:.1} probes={}",
                telemetry.elapsed_seconds,
                frame.position.x,
                frame.position.y,
                frame.position.z,
                frame.heading.rem_euclid(360.0),
                frame.speed,
                frame.valid_samples
            );
        }
    }
}

fn stop_when_done(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    telemetry: Res<Telemetry>,
    mut exit: EventWriter<AppExit>,
) {
    if time.elapsed_secs_f64() < config.simulation.duration_seconds {
        return;
    }
    info!(
        "Run complete: {} ticks, {:.1} s, distance {:.1}, top speed {:.1}, airborne ticks {}",
        telemetry.ticks,
        telemetry.elapsed_seconds,
        telemetry.distance,
        telemetry.top_speed,
        telemetry.airborne_ticks
    );
    exit.write(AppExit::Success);
}
