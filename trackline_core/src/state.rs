// trackline_core/src/state.rs

use crate::config::VehicleParams;
use crate::types::{world_up, Point, UnitVector};

/// The per-vehicle values the drive pipeline threads through each stage.
///
/// `heading` is written only by steering. Nothing in the ground solver takes
/// a mutable borrow of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// World-space position.
    pub position: Point,
    /// Heading accumulator in degrees about world up. Not wrapped.
    pub heading: f64,
    /// Signed speed, bounded by the drive parameters.
    pub speed: f64,
}

impl VehicleState {
    pub fn spawn(params: &VehicleParams) -> Self {
        Self {
            position: params.spawn_position,
            heading: params.spawn_heading_deg,
            speed: 0.0,
        }
    }

    /// Heading folded into `[0, 360)` for display.
    pub fn heading_wrapped(&self) -> f64 {
        self.heading.rem_euclid(360.0)
    }
}

/// Single-slot memory for the accepted up vector.
///
/// Read at the start of a frame, written once at the end by the smoother.
/// The write handle is crate-private so no other stage can touch it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpMemory {
    last_up: UnitVector,
}

impl Default for UpMemory {
    fn default() -> Self {
        Self {
            last_up: world_up(),
        }
    }
}

impl UpMemory {
    pub fn get(&self) -> UnitVector {
        self.last_up
    }

    pub(crate) fn store(&mut self, up: UnitVector) {
        self.last_up = up;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_copies_pose_and_starts_stopped() {
        let params = VehicleParams {
            spawn_heading_deg: 45.0,
            ..Default::default()
        };
        let state = VehicleState::spawn(&params);
        assert_eq!(state.position, params.spawn_position);
        assert_eq!(state.heading, 45.0);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn heading_wraps_for_display_only() {
        let state = VehicleState {
            position: Point::origin(),
            heading: -90.0,
            speed: 0.0,
        };
        assert_eq!(state.heading_wrapped(), 270.0);
        assert_eq!(state.heading, -90.0);
    }

    #[test]
    fn up_memory_starts_at_world_up() {
        assert_eq!(UpMemory::default().get(), world_up());
    }
}
