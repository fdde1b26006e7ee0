// trackline_core/src/ground/fit.rs

use tracing::trace;

use super::sampler::GroundSample;
use crate::types::{face_up, try_unit, UnitVector, Vector};

/// Fits one upward unit normal to the valid samples.
///
/// Three hits give the exact plane through them; one or two hits average their
/// own normals; none, or a degenerate result, returns `previous_up`.
/// Invalid samples in `samples` are ignored.
pub fn fit_normal(samples: &[GroundSample], previous_up: &UnitVector) -> UnitVector {
    let points: Vec<_> = samples
        .iter()
        .filter(|s| s.valid)
        .filter_map(|s| s.hit_point)
        .collect();
    let normals: Vec<_> = samples
        .iter()
        .filter(|s| s.valid)
        .filter_map(|s| s.hit_normal)
        .collect();

    let raw = match points.as_slice() {
        [] => return *previous_up,
        [p1, p2, p3, ..] => (p1 - p3).cross(&(p2 - p3)),
        _ => normals
            .iter()
            .fold(Vector::zeros(), |acc, n| acc + n.into_inner()),
    };

    match try_unit(&raw) {
        Some(n) => face_up(n),
        None => {
            trace!("degenerate fitted normal, holding previous up");
            *previous_up
        }
    }
}

/// Middle hit height of the valid samples (upper middle for an even count).
///
/// The median ignores a single probe that caught a curb or seam, where a mean
/// would be dragged toward it.
pub fn median_height(samples: &[GroundSample]) -> Option<f64> {
    let mut heights: Vec<f64> = samples
        .iter()
        .filter(|s| s.valid)
        .filter_map(|s| s.hit_point.map(|p| p.z))
        .collect();
    if heights.is_empty() {
        return None;
    }
    heights.sort_by(f64::total_cmp);
    Some(heights[heights.len() / 2])
}
