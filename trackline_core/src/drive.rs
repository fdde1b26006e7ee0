// trackline_core/src/drive.rs

//! Arcade longitudinal/lateral integrator.
//!
//! Speed responds to the pedals, heading to the steering with an authority
//! that grows with speed, and the position advances along the current
//! orientation's forward axis. Nothing here looks at the terrain.

use tracing::trace;

use crate::config::DriveParams;
use crate::input::DriveInput;
use crate::orientation::build_orientation;
use crate::state::VehicleState;
use crate::types::{world_forward, UnitVector};

/// Speed at which steering reaches full authority, as a fraction of `max_speed`.
const FULL_STEER_SPEED_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct DriveIntegrator {
    params: DriveParams,
}

impl DriveIntegrator {
    pub fn new(params: DriveParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DriveParams {
        &self.params
    }

    /// Clamps a raw frame delta to `[0, max_dt]`. Non-finite deltas become 0.
    pub fn clamp_dt(&self, dt: f64) -> f64 {
        if !dt.is_finite() {
            trace!(dt, "non-finite frame delta treated as zero");
            return 0.0;
        }
        num_traits::clamp(dt, 0.0, self.params.max_dt)
    }

    /// Applies throttle, brake or friction, then clamps to the speed range.
    ///
    /// Throttle and brake both apply when both are held. Friction only acts
    /// with neither pedal held and never carries the speed past zero.
    pub fn update_speed(&self, speed: f64, input: &DriveInput, dt: f64) -> f64 {
        let p = &self.params;
        let mut speed = speed;
        if input.accelerate {
            speed += p.accel * dt;
        }
        if input.brake {
            speed -= p.brake * dt;
        }
        if !input.accelerate && !input.brake {
            let decay = p.friction * dt;
            speed = if speed > 0.0 {
                (speed - decay).max(0.0)
            } else if speed < 0.0 {
                (speed + decay).min(0.0)
            } else {
                0.0
            };
        }
        num_traits::clamp(speed, p.min_reverse_speed, p.max_speed)
    }

    /// Steering rate in deg/s for the given speed.
    pub fn steer_rate(&self, speed: f64) -> f64 {
        let p = &self.params;
        let authority = (speed.abs() / (FULL_STEER_SPEED_FRACTION * p.max_speed)).min(1.0);
        p.turn_min + (p.turn_rate - p.turn_min) * authority
    }

    /// Heading change in degrees for one frame. Reversing turns the other way;
    /// a stopped vehicle steers as if rolling forward.
    pub fn heading_delta(&self, speed: f64, input: &DriveInput, dt: f64) -> f64 {
        let direction = if speed >= 0.0 { 1.0 } else { -1.0 };
        input.steer() * self.steer_rate(speed) * dt * direction
    }

    /// Advances speed, heading and position by one already-clamped `dt`.
    ///
    /// The forward axis comes from the updated heading and `last_up`, so the
    /// vehicle travels along the plane it was last aligned to.
    pub fn integrate(
        &self,
        state: &mut VehicleState,
        input: &DriveInput,
        dt: f64,
        last_up: &UnitVector,
    ) {
        state.speed = self.update_speed(state.speed, input, dt);
        state.heading += self.heading_delta(state.speed, input, dt);

        let forward = build_orientation(state.heading, last_up) * world_forward();
        state.position += forward.into_inner() * (state.speed * self.params.speed_mult * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{world_up, Point};
    use approx::assert_abs_diff_eq;

    fn integrator() -> DriveIntegrator {
        DriveIntegrator::new(DriveParams::default())
    }

    fn held(accelerate: bool, brake: bool, steer_left: bool, steer_right: bool) -> DriveInput {
        DriveInput {
            accelerate,
            brake,
            steer_left,
            steer_right,
        }
    }

    #[test]
    fn speed_stays_inside_caps() {
        let drive = integrator();
        let mut speed = 0.0;
        for _ in 0..500 {
            speed = drive.update_speed(speed, &held(true, false, false, false), 1.0 / 30.0);
            assert!(speed <= 80.0);
        }
        assert_eq!(speed, 80.0);
        for _ in 0..500 {
            speed = drive.update_speed(speed, &held(false, true, false, false), 1.0 / 30.0);
            assert!(speed >= -10.0);
        }
        assert_eq!(speed, -10.0);
        // Clamping an in-range speed is a no-op.
        assert_eq!(drive.update_speed(speed, &held(true, true, false, false), 0.0), speed);
    }

    #[test]
    fn friction_never_overshoots_zero() {
        let drive = integrator();
        let idle = DriveInput::default();
        assert_eq!(drive.update_speed(0.1, &idle, 1.0 / 30.0), 0.0);
        assert_eq!(drive.update_speed(-0.1, &idle, 1.0 / 30.0), 0.0);
        assert_abs_diff_eq!(drive.update_speed(10.0, &idle, 0.5), 8.0, epsilon = 1e-12);
        assert_eq!(drive.update_speed(0.0, &idle, 0.5), 0.0);
    }

    #[test]
    fn both_pedals_apply_together() {
        let drive = integrator();
        let speed = drive.update_speed(20.0, &held(true, true, false, false), 0.1);
        assert_abs_diff_eq!(speed, 20.0 + 2.5 - 4.0, epsilon = 1e-12);
    }

    #[test]
    fn steering_authority_grows_with_speed() {
        let drive = integrator();
        assert_abs_diff_eq!(drive.steer_rate(0.0), 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(drive.steer_rate(24.0), 25.0 + 65.0 * 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(drive.steer_rate(48.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(drive.steer_rate(80.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(drive.steer_rate(-48.0), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn reversing_inverts_steering() {
        let drive = integrator();
        let left = held(false, false, true, false);
        let forward = drive.heading_delta(5.0, &left, 0.1);
        let reverse = drive.heading_delta(-5.0, &left, 0.1);
        assert!(forward > 0.0);
        assert_abs_diff_eq!(reverse, -forward, epsilon = 1e-12);
        // Stationary steers at minimum authority, turning left.
        assert_abs_diff_eq!(drive.heading_delta(0.0, &left, 1.0), 25.0, epsilon = 1e-12);
        // Opposite steer inputs cancel.
        assert_eq!(drive.heading_delta(5.0, &held(false, false, true, true), 0.1), 0.0);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let drive = integrator();
        assert_eq!(drive.clamp_dt(-1.0), 0.0);
        assert_eq!(drive.clamp_dt(f64::NAN), 0.0);
        assert_eq!(drive.clamp_dt(f64::INFINITY), 0.0);
        assert_eq!(drive.clamp_dt(0.01), 0.01);
        assert_eq!(drive.clamp_dt(0.5), 1.0 / 30.0);
    }

    #[test]
    fn moves_along_heading() {
        let drive = integrator();
        let mut state = VehicleState {
            position: Point::origin(),
            heading: 90.0,
            speed: 10.0,
        };
        let input = held(false, false, false, false);
        drive.integrate(&mut state, &input, 0.1, &world_up());

        // Heading 90 faces -X.
        let expected_speed = 10.0 - 4.0 * 0.1;
        assert_abs_diff_eq!(state.speed, expected_speed, epsilon = 1e-12);
        assert_abs_diff_eq!(state.position.x, -expected_speed * 100.0 * 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-9);
        assert_eq!(state.heading, 90.0);
    }

    #[test]
    fn climbs_along_a_tilted_last_up() {
        let drive = integrator();
        let mut state = VehicleState {
            position: Point::origin(),
            heading: 0.0,
            speed: 10.0,
        };
        let up = UnitVector::new_normalize(crate::types::Vector::new(0.0, -0.5, 1.0));
        drive.integrate(&mut state, &held(false, false, false, false), 0.1, &up);

        // Forward follows the plane: one unit of climb for every two ahead.
        assert_abs_diff_eq!(state.position.z * 2.0, state.position.y, epsilon = 1e-9);
        assert!(state.position.z > 0.0);
    }
}
