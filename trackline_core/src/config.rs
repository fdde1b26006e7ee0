// trackline_core/src/config.rs

//! Tuning parameters for the drive integrator and the ground solver.
//!
//! Every struct deserializes with defaults for missing fields, so a scenario
//! file only needs to name the values it changes.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{in_range, non_negative, positive, ConfigError};

// =========================================================================
// == Drive ==
// =========================================================================

/// Arcade longitudinal/lateral tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveParams {
    /// Forward speed cap.
    pub max_speed: f64,
    /// Reverse speed cap. Zero or negative.
    pub min_reverse_speed: f64,
    /// Speed gained per second while accelerating.
    pub accel: f64,
    /// Speed lost per second while braking. Braking past zero reverses.
    pub brake: f64,
    /// Speed decay per second when neither pedal is held.
    pub friction: f64,
    /// Steering rate in deg/s at full authority.
    pub turn_rate: f64,
    /// Steering rate in deg/s when stationary.
    pub turn_min: f64,
    /// Arcade multiplier on forward displacement. Not a unit conversion.
    pub speed_mult: f64,
    /// Largest frame delta accepted; longer frames integrate as this.
    pub max_dt: f64,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            max_speed: 80.0,
            min_reverse_speed: -10.0,
            accel: 25.0,
            brake: 40.0,
            friction: 4.0,
            turn_rate: 90.0,
            turn_min: 25.0,
            speed_mult: 100.0,
            max_dt: 1.0 / 30.0,
        }
    }
}

impl DriveParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_speed", self.max_speed)?;
        if !self.min_reverse_speed.is_finite() || self.min_reverse_speed > 0.0 {
            return Err(ConfigError::PositiveReverseCap(self.min_reverse_speed));
        }
        non_negative("accel", self.accel)?;
        non_negative("brake", self.brake)?;
        non_negative("friction", self.friction)?;
        non_negative("turn_rate", self.turn_rate)?;
        non_negative("turn_min", self.turn_min)?;
        if self.turn_min > self.turn_rate {
            return Err(ConfigError::TurnRange {
                turn_min: self.turn_min,
                turn_rate: self.turn_rate,
            });
        }
        non_negative("speed_mult", self.speed_mult)?;
        positive("max_dt", self.max_dt)
    }
}

// =========================================================================
// == Ground ==
// =========================================================================

/// Probe layout and filtering for the ground solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroundParams {
    /// Minimum vertical component of an upward-facing hit normal.
    /// Hits below this are treated as walls and dropped.
    pub ground_z_min: f64,
    /// Per-frame budget for rotating the accepted up, in degrees.
    pub max_step_deg_per_frame: f64,
    /// Weight of the new candidate in the exponential smoother.
    pub smooth_alpha: f64,
    /// Height above the vehicle where probe rays start.
    pub ray_height: f64,
    /// Length of each probe ray, measured downward from its origin.
    pub ray_length: f64,
    /// Front probes sit this fraction of the half-length ahead of center.
    pub sample_forward_fraction: f64,
    /// Rear probe sits this fraction of the half-length behind center.
    pub sample_rear_fraction: f64,
    /// Front probes sit this fraction of the half-width to either side.
    pub sample_width_fraction: f64,
    /// Surfaces steeper than this are pulled toward world up.
    pub max_slope_deg: f64,
    /// How far a too-steep normal is pulled toward world up (0 = none, 1 = snap).
    pub slope_blend: f64,
    /// Added to the median probe height to get the suggested ride height.
    pub ride_clearance: f64,
    /// Changes larger than this many degrees count as "big" for the change gate.
    pub change_trigger_deg: f64,
    /// Consecutive frames a big change must persist before it is accepted.
    /// `0` or `1` disables the gate.
    pub accept_frames: u32,
}

impl Default for GroundParams {
    fn default() -> Self {
        Self {
            ground_z_min: 0.25,
            max_step_deg_per_frame: 30.0,
            smooth_alpha: 0.35,
            ray_height: 4.0,
            ray_length: 30.0,
            sample_forward_fraction: 0.70,
            sample_rear_fraction: 0.60,
            sample_width_fraction: 0.60,
            max_slope_deg: 55.0,
            slope_blend: 0.6,
            ride_clearance: 0.25,
            change_trigger_deg: 10.0,
            accept_frames: 0,
        }
    }
}

impl GroundParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("ground_z_min", self.ground_z_min, 0.0, 1.0)?;
        in_range("max_step_deg_per_frame", self.max_step_deg_per_frame, 0.0, 180.0)?;
        // Zero would freeze the accepted up forever.
        if self.smooth_alpha <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "smooth_alpha",
                value: self.smooth_alpha,
                min: f64::EPSILON,
                max: 1.0,
            });
        }
        in_range("smooth_alpha", self.smooth_alpha, 0.0, 1.0)?;
        non_negative("ray_height", self.ray_height)?;
        positive("ray_length", self.ray_length)?;
        non_negative("sample_forward_fraction", self.sample_forward_fraction)?;
        non_negative("sample_rear_fraction", self.sample_rear_fraction)?;
        non_negative("sample_width_fraction", self.sample_width_fraction)?;
        in_range("max_slope_deg", self.max_slope_deg, 0.0, 90.0)?;
        in_range("slope_blend", self.slope_blend, 0.0, 1.0)?;
        non_negative("ride_clearance", self.ride_clearance)?;
        in_range("change_trigger_deg", self.change_trigger_deg, 0.0, 180.0)
    }
}

// =========================================================================
// == Vehicle ==
// =========================================================================

/// Spawn pose and body dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleParams {
    /// World-space spawn position.
    pub spawn_position: Point3<f64>,
    /// Spawn heading in degrees, about world up.
    pub spawn_heading_deg: f64,
    /// Uniform model scale; multiplies the half extents below.
    pub scale: f64,
    /// Half of the unscaled body width.
    pub half_width: f64,
    /// Half of the unscaled body length.
    pub half_length: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            spawn_position: Point3::new(0.0, -5.0, 0.20),
            spawn_heading_deg: 0.0,
            scale: 0.45,
            half_width: 0.9,
            half_length: 2.0,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("scale", self.scale)?;
        non_negative("half_width", self.half_width)?;
        non_negative("half_length", self.half_length)?;
        if !self.spawn_heading_deg.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "spawn_heading_deg",
                value: self.spawn_heading_deg,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        Ok(())
    }

    /// Scaled `(half_width, half_length)`.
    pub fn half_extents(&self) -> (f64, f64) {
        (self.half_width * self.scale, self.half_length * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DriveParams::default().validate().unwrap();
        GroundParams::default().validate().unwrap();
        VehicleParams::default().validate().unwrap();
    }

    #[test]
    fn positive_reverse_cap_is_rejected() {
        let params = DriveParams {
            min_reverse_speed: 5.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::PositiveReverseCap(5.0))
        );
    }

    #[test]
    fn zero_smoothing_is_rejected() {
        let params = GroundParams {
            smooth_alpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange {
                name: "smooth_alpha",
                ..
            })
        ));
    }

    #[test]
    fn turn_min_above_turn_rate_is_rejected() {
        let params = DriveParams {
            turn_min: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::TurnRange { .. })
        ));
    }

    #[test]
    fn half_extents_apply_scale() {
        let (w, l) = VehicleParams::default().half_extents();
        assert!((w - 0.405).abs() < 1e-12);
        assert!((l - 0.9).abs() < 1e-12);
    }
}
