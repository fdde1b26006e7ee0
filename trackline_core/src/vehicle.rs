// trackline_core/src/vehicle.rs

//! The per-vehicle pipeline: drive, then ground alignment, then orientation.

use tracing::trace;

use crate::config::{DriveParams, GroundParams, VehicleParams};
use crate::drive::DriveIntegrator;
use crate::error::ConfigError;
use crate::ground::{GroundEstimate, GroundSolver};
use crate::input::DriveInput;
use crate::orientation::{build_orientation, OrientationFrame};
use crate::state::VehicleState;
use crate::terrain::TerrainQuery;
use crate::types::{Point, Rotation, UnitVector};

/// What one call to [`Vehicle::step`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub position: Point,
    pub rotation: Rotation,
    pub frame: OrientationFrame,
    /// Heading accumulator in degrees, exactly as steering left it.
    pub heading: f64,
    pub speed: f64,
    /// The ground solver's accepted up. Re-imposing the heading can tilt
    /// `frame.up` slightly away from it, so the two need not match.
    pub up: UnitVector,
    /// Suggested ride height, absent when no probe found ground.
    pub ride_height: Option<f64>,
    pub valid_samples: usize,
    /// The clamped delta actually integrated.
    pub dt: f64,
}

/// One drivable vehicle and everything it remembers between frames.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::component::Component))]
pub struct Vehicle {
    params: VehicleParams,
    drive: DriveIntegrator,
    ground: GroundSolver,
    state: VehicleState,
    rotation: Rotation,
}

impl Vehicle {
    /// Validates every parameter set and places the vehicle at its spawn pose.
    pub fn new(
        params: VehicleParams,
        drive: DriveParams,
        ground: GroundParams,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        drive.validate()?;
        ground.validate()?;

        let state = VehicleState::spawn(&params);
        let ground = GroundSolver::new(ground);
        let rotation = build_orientation(state.heading, &ground.last_up());
        Ok(Self {
            params,
            drive: DriveIntegrator::new(drive),
            ground,
            state,
            rotation,
        })
    }

    /// Advances the vehicle by one frame.
    ///
    /// `dt` is clamped first. The heading is only touched by steering; the
    /// ground solver reads it to place its probes and the final orientation
    /// re-imposes it exactly. When no probe finds ground the vertical position
    /// stays at its last value.
    pub fn step<T: TerrainQuery + ?Sized>(
        &mut self,
        dt: f64,
        input: &DriveInput,
        terrain: &T,
    ) -> FrameOutput {
        let dt = self.drive.clamp_dt(dt);

        let last_up = self.ground.last_up();
        let last_z = self.state.position.z;
        self.drive.integrate(&mut self.state, input, dt, &last_up);

        let estimate: GroundEstimate = self.ground.estimate(
            terrain,
            &self.state.position,
            self.state.heading,
            self.params.half_extents(),
        );
        self.state.position.z = estimate.ride_height.unwrap_or(last_z);

        self.rotation = build_orientation(self.state.heading, &estimate.up);
        trace!(
            heading = self.state.heading,
            speed = self.state.speed,
            valid = estimate.valid_samples,
            "vehicle step"
        );

        FrameOutput {
            position: self.state.position,
            rotation: self.rotation,
            frame: OrientationFrame::from_rotation(&self.rotation),
            heading: self.state.heading,
            speed: self.state.speed,
            up: estimate.up,
            ride_height: estimate.ride_height,
            valid_samples: estimate.valid_samples,
            dt,
        }
    }

    /// Puts the vehicle back at its spawn pose and forgets the ground history.
    pub fn respawn(&mut self) {
        self.state = VehicleState::spawn(&self.params);
        self.ground = GroundSolver::new(self.ground.params().clone());
        self.rotation = build_orientation(self.state.heading, &self.ground.last_up());
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Accepted up from the last frame.
    pub fn up(&self) -> UnitVector {
        self.ground.last_up()
    }

    pub fn orientation(&self) -> Rotation {
        self.rotation
    }
}
