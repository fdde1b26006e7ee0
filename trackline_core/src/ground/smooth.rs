// trackline_core/src/ground/smooth.rs

use crate::types::{try_unit, UnitVector};

/// One step of the exponential low-pass on the accepted up:
/// `normalize((1 - alpha) * previous + alpha * candidate)`.
///
/// A blend that cancels to zero holds `previous_up`.
pub fn smooth_up(previous_up: &UnitVector, candidate: &UnitVector, alpha: f64) -> UnitVector {
    let blended = previous_up.into_inner() * (1.0 - alpha) + candidate.into_inner() * alpha;
    try_unit(&blended).unwrap_or(*previous_up)
}
