// trackline_core/src/ground/mod.rs

//! Terrain alignment: derives the frame's accepted up vector from a handful
//! of downward probes.
//!
//! Stages run in a fixed order each frame:
//! sample -> fit -> limit -> gate -> smooth.
//! The smoother's output is the only write to the up memory.

pub mod fit;
pub mod gate;
pub mod limit;
pub mod sampler;
pub mod smooth;

use tracing::debug;

use crate::config::GroundParams;
use crate::orientation::build_orientation;
use crate::state::UpMemory;
use crate::terrain::TerrainQuery;
use crate::types::{Point, UnitVector};

pub use fit::{fit_normal, median_height};
pub use gate::ChangeGate;
pub use limit::{limit_normal, limit_step, limit_steepness};
pub use sampler::{sample_ground, GroundSample, ProbeLayout};
pub use smooth::smooth_up;

/// Everything the ground solver learned this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundEstimate {
    /// Accepted up for this frame.
    pub up: UnitVector,
    /// Median valid hit height plus ride clearance, if any probe hit ground.
    pub ride_height: Option<f64>,
    /// Number of probes that produced a valid ground sample.
    pub valid_samples: usize,
    /// Raw probe results, in layout order.
    pub samples: [GroundSample; 3],
}

/// Owns the accepted-up memory and the change gate for one vehicle.
#[derive(Debug, Clone)]
pub struct GroundSolver {
    params: GroundParams,
    memory: UpMemory,
    gate: ChangeGate,
}

impl GroundSolver {
    pub fn new(params: GroundParams) -> Self {
        Self {
            params,
            memory: UpMemory::default(),
            gate: ChangeGate::new(),
        }
    }

    pub fn params(&self) -> &GroundParams {
        &self.params
    }

    /// The up vector accepted on the last frame (world up before the first).
    pub fn last_up(&self) -> UnitVector {
        self.memory.get()
    }

    /// Runs one frame of the solver.
    ///
    /// `heading_deg` and the remembered up give the orientation used to place
    /// the probes; neither is modified. With no valid probe the previous up is
    /// kept and no ride height is suggested.
    pub fn estimate<T: TerrainQuery + ?Sized>(
        &mut self,
        terrain: &T,
        position: &Point,
        heading_deg: f64,
        half_extents: (f64, f64),
    ) -> GroundEstimate {
        let previous_up = self.memory.get();
        let orientation = build_orientation(heading_deg, &previous_up);
        let layout = ProbeLayout::new(&self.params, half_extents.0, half_extents.1);
        let samples = sample_ground(terrain, position, &orientation, &layout, &self.params);
        let valid_samples = samples.iter().filter(|s| s.valid).count();

        if valid_samples == 0 {
            debug!(x = position.x, y = position.y, "no ground under vehicle, holding previous up");
            return GroundEstimate {
                up: previous_up,
                ride_height: None,
                valid_samples,
                samples,
            };
        }

        let fitted = fit_normal(&samples, &previous_up);
        let limited = limit_normal(&fitted, &previous_up, &self.params);
        let gated = self.gate.apply(
            &limited,
            &previous_up,
            self.params.change_trigger_deg,
            self.params.accept_frames,
        );
        let up = smooth_up(&previous_up, &gated, self.params.smooth_alpha);
        self.memory.store(up);

        let ride_height = median_height(&samples).map(|z| z + self.params.ride_clearance);

        GroundEstimate {
            up,
            ride_height,
            valid_samples,
            samples,
        }
    }
}
