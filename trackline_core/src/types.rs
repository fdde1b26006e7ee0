// trackline_core/src/types.rs

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

// --- Core Type Aliases ---
pub type Point = Point3<f64>;
pub type Vector = Vector3<f64>;
pub type UnitVector = Unit<Vector3<f64>>;
pub type Rotation = UnitQuaternion<f64>;

/// Squared-length threshold below which a vector is treated as degenerate.
pub const DEGENERATE_LENGTH_SQ: f64 = 1e-12;

/// Added to near-zero denominators so a frame is never discarded for dividing by zero.
pub const DENOMINATOR_EPSILON: f64 = 1e-6;

// World convention: right-handed, Z up, +Y forward, +X right (ENU).

/// The world vertical, `+Z`.
pub fn world_up() -> UnitVector {
    Vector3::z_axis()
}

/// The direction a vehicle faces at heading 0, `+Y`.
pub fn world_forward() -> UnitVector {
    Vector3::y_axis()
}

/// The direction to the right of a vehicle at heading 0, `+X`.
pub fn world_right() -> UnitVector {
    Vector3::x_axis()
}

/// Normalizes `v`, or returns `None` if it is too short or not finite.
pub fn try_unit(v: &Vector) -> Option<UnitVector> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    Unit::try_new(*v, DEGENERATE_LENGTH_SQ.sqrt())
}

/// Flips `v` so its vertical component is non-negative.
pub fn face_up(v: UnitVector) -> UnitVector {
    if v.z < 0.0 {
        -v
    } else {
        v
    }
}

/// Angle between two unit vectors in degrees, robust to rounding past ±1.
pub fn angle_between_deg(a: &UnitVector, b: &UnitVector) -> f64 {
    num_traits::clamp(a.into_inner().dot(&b.into_inner()), -1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn try_unit_rejects_zero_and_nan() {
        assert!(try_unit(&Vector::zeros()).is_none());
        assert!(try_unit(&Vector::new(f64::NAN, 0.0, 1.0)).is_none());
        let u = try_unit(&Vector::new(0.0, 3.0, 4.0)).unwrap();
        assert_abs_diff_eq!(u.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn face_up_flips_downward_vectors() {
        let down = -world_up();
        assert_abs_diff_eq!(face_up(down).z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(face_up(world_up()).z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn world_axes_are_right_handed() {
        let up = world_right().cross(&world_forward().into_inner());
        assert_abs_diff_eq!(up, world_up().into_inner(), epsilon = 1e-12);
    }
}
