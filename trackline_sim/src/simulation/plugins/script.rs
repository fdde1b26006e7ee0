// trackline_sim/src/simulation/plugins/script.rs

//! Scripted driver: replays the scenario's `[[script]]` segments as held
//! controls, one lookup per tick.

use bevy::prelude::*;
use trackline_core::error::ControlParseError;
use trackline_core::input::{Control, DriveInput};

use crate::simulation::config::{ScenarioConfig, ScriptSegment};
use crate::simulation::core::app_state::SimulationSet;

/// The controls held this tick, read by the drive system.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverInput(pub DriveInput);

/// Segment end times paired with what is held until then.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ScriptTimeline {
    segments: Vec<(f64, DriveInput)>,
}

impl ScriptTimeline {
    pub fn from_segments(segments: &[ScriptSegment]) -> Result<Self, ControlParseError> {
        let mut end = 0.0;
        let mut timeline = Vec::with_capacity(segments.len());
        for segment in segments {
            let controls = segment
                .hold
                .iter()
                .map(|name| name.parse::<Control>())
                .collect::<Result<Vec<_>, _>>()?;
            end += segment.duration_seconds;
            timeline.push((end, DriveInput::from_controls(&controls)));
        }
        Ok(Self { segments: timeline })
    }

    /// Held controls at `t` seconds. Nothing is held past the last segment.
    pub fn input_at(&self, t: f64) -> DriveInput {
        self.segments
            .iter()
            .find(|(end, _)| t < *end)
            .map(|(_, input)| *input)
            .unwrap_or_default()
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.last().map_or(0.0, |(end, _)| *end)
    }
}

pub struct ScriptPlugin;

impl Plugin for ScriptPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScriptTimeline>()
            .add_systems(Startup, load_script)
            .add_systems(FixedUpdate, scripted_driver.in_set(SimulationSet::Input));
    }
}

/// STARTUP: parses the control names once.
fn load_script(
    config: Res<ScenarioConfig>,
    mut timeline: ResMut<ScriptTimeline>,
    mut exit: EventWriter<AppExit>,
) {
    match ScriptTimeline::from_segments(&config.script) {
        Ok(parsed) => {
            info!(
                "Script loaded: {} segments, {:.2} s",
                config.script.len(),
                parsed.total_duration()
            );
            *timeline = parsed;
        }
        Err(e) => {
            error!("Failed to load script: {}", e);
            exit.write(AppExit::error());
        }
    }
}

/// Writes the held controls for the start of this tick.
fn scripted_driver(
    time: Res<Time>,
    timeline: Res<ScriptTimeline>,
    mut drivers: Query<&mut DriverInput>,
) {
    let tick_start = time.elapsed_secs_f64() - time.delta_secs_f64();
    let input = timeline.input_at(tick_start);
    for mut driver in &mut drivers {
        driver.0 = input;
    }
}
