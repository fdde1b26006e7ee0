// trackline_sim/src/simulation/plugins/vehicle.rs

use bevy::prelude::*;
use trackline_core::vehicle::{FrameOutput, Vehicle};

use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::app_state::SimulationSet;
use crate::simulation::core::transforms::enu_pose_to_bevy_transform;
use crate::simulation::plugins::script::DriverInput;
use crate::simulation::plugins::track::TrackCollider;

// --- BEVY COMPONENTS ---

/// The pipeline's output from the most recent tick, if there has been one.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LastFrame(pub Option<FrameOutput>);

// --- THE PLUGIN ---
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_vehicle)
            .add_systems(FixedUpdate, drive_vehicles.in_set(SimulationSet::Drive));
    }
}

// --- SYSTEMS ---

/// STARTUP: places the vehicle at its configured spawn pose.
fn spawn_vehicle(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    mut exit: EventWriter<AppExit>,
) {
    let vehicle = match Vehicle::new(
        config.vehicle.clone(),
        config.drive.clone(),
        config.ground.clone(),
    ) {
        Ok(vehicle) => vehicle,
        Err(e) => {
            error!("Failed to create vehicle: {}", e);
            exit.write(AppExit::error());
            return;
        }
    };

    let state = vehicle.state();
    info!(
        "  -> Spawning vehicle at ({:.2}, {:.2}, {:.2}) heading {:.1} deg",
        state.position.x, state.position.y, state.position.z, state.heading
    );
    let transform = enu_pose_to_bevy_transform(
        &state.position,
        &vehicle.orientation(),
        vehicle.params().scale,
    );

    commands.spawn((
        Name::new("vehicle"),
        transform,
        DriverInput::default(),
        LastFrame::default(),
        vehicle,
    ));
}

/// RUNTIME: one pipeline step per fixed tick, then the pose goes back onto
/// the entity's `Transform`.
fn drive_vehicles(
    time: Res<Time>,
    track: Option<Res<TrackCollider>>,
    mut vehicles: Query<(&mut Vehicle, &DriverInput, &mut Transform, &mut LastFrame)>,
) {
    // Startup failed; the app is already on its way out.
    let Some(track) = track else {
        return;
    };
    let dt = time.delta_secs_f64();

    for (mut vehicle, input, mut transform, mut last) in &mut vehicles {
        let frame = vehicle.step(dt, &input.0, &*track);
        if frame.valid_samples == 0 {
            trace!("no ground under vehicle this tick");
        }
        *transform =
            enu_pose_to_bevy_transform(&frame.position, &frame.rotation, vehicle.params().scale);
        last.0 = Some(frame);
    }
}
