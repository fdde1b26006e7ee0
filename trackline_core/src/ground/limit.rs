// trackline_core/src/ground/limit.rs

//! Bounds on the fitted normal: how steep it may be, and how far the accepted
//! up may rotate in a single frame.

use tracing::{debug, trace};

use crate::config::GroundParams;
use crate::types::{angle_between_deg, try_unit, world_up, UnitVector, DENOMINATOR_EPSILON};

/// Pulls a normal steeper than `max_slope_deg` part of the way toward world up.
///
/// Near-vertical geometry is treated as a wall: the chassis leans toward
/// upright instead of lying flat against it. Not a full snap.
pub fn limit_steepness(normal: &UnitVector, max_slope_deg: f64, blend: f64) -> UnitVector {
    let slope_deg = angle_between_deg(normal, &world_up());
    if slope_deg <= max_slope_deg {
        return *normal;
    }
    trace!(slope_deg, "slope above limit, blending toward world up");
    let blended = normal.into_inner() * (1.0 - blend) + world_up().into_inner() * blend;
    try_unit(&blended).unwrap_or_else(world_up)
}

/// Rotates `previous_up` toward `candidate` by at most `max_step_deg`.
///
/// A candidate inside the budget passes through unchanged. Otherwise the
/// result lies on the great circle from `previous_up` to `candidate`, exactly
/// `max_step_deg` away from `previous_up`. An antiparallel candidate has no
/// defined direction of travel and holds `previous_up`.
pub fn limit_step(candidate: &UnitVector, previous_up: &UnitVector, max_step_deg: f64) -> UnitVector {
    let max_step = max_step_deg.to_radians();
    let max_step_cos = max_step.cos();
    let prev = previous_up.into_inner();
    let cand = candidate.into_inner();
    let d = num_traits::clamp(cand.dot(&prev), -1.0, 1.0);
    if d >= max_step_cos {
        return *candidate;
    }

    // Component of the candidate orthogonal to the previous up.
    let across = cand - prev * d;
    let across_len = across.norm();
    if across_len * across_len < DENOMINATOR_EPSILON * DENOMINATOR_EPSILON {
        debug!("candidate opposes previous up, holding previous up");
        return *previous_up;
    }
    let direction = across / across_len;

    let stepped = prev * max_step.cos() + direction * max_step.sin();
    try_unit(&stepped).unwrap_or(*previous_up)
}

/// Steepness clamp followed by the per-frame angular-step clamp.
pub fn limit_normal(fitted: &UnitVector, previous_up: &UnitVector, params: &GroundParams) -> UnitVector {
    let upright = limit_steepness(fitted, params.max_slope_deg, params.slope_blend);
    limit_step(&upright, previous_up, params.max_step_deg_per_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector;
    use approx::assert_abs_diff_eq;

    fn tilted(deg: f64) -> UnitVector {
        let r = deg.to_radians();
        UnitVector::new_normalize(Vector::new(r.sin(), 0.0, r.cos()))
    }

    #[test]
    fn step_lands_exactly_on_the_boundary() {
        let limited = limit_step(&tilted(45.0), &world_up(), 30.0);
        assert_abs_diff_eq!(angle_between_deg(&limited, &world_up()), 30.0, epsilon = 1e-9);
        // Still heading toward the candidate.
        assert!(limited.x > 0.0);
        assert_abs_diff_eq!(limited.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn small_step_passes_unchanged() {
        let candidate = tilted(20.0);
        assert_eq!(limit_step(&candidate, &world_up(), 30.0), candidate);
    }

    #[test]
    fn step_is_measured_from_previous_up() {
        let previous = tilted(10.0);
        let limited = limit_step(&tilted(-50.0), &previous, 30.0);
        assert_abs_diff_eq!(angle_between_deg(&limited, &previous), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_between_deg(&limited, &world_up()), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn antiparallel_candidate_holds_previous() {
        let limited = limit_step(&(-world_up()), &world_up(), 30.0);
        assert_eq!(limited, world_up());
    }

    #[test]
    fn steep_normal_is_partly_pulled_upright() {
        let wall_ish = tilted(70.0);
        let pulled = limit_steepness(&wall_ish, 55.0, 0.6);
        let slope = angle_between_deg(&pulled, &world_up());
        assert!(slope < 55.0 && slope > 0.0, "slope was {slope}");

        let expected = UnitVector::new_normalize(
            wall_ish.into_inner() * 0.4 + world_up().into_inner() * 0.6,
        );
        assert_abs_diff_eq!(pulled.into_inner(), expected.into_inner(), epsilon = 1e-12);
    }

    #[test]
    fn gentle_slope_is_not_pulled() {
        let slope = tilted(30.0);
        assert_eq!(limit_steepness(&slope, 55.0, 0.6), slope);
    }
}
