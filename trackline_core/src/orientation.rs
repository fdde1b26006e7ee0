// trackline_core/src/orientation.rs

//! Composition of driver heading with the accepted ground up vector.
//!
//! Tilt is applied as the shortest-arc rotation from world up to the accepted
//! up, and the resulting frame is then re-expressed as heading/pitch/roll with
//! the heading channel overwritten by the driver's value. Ground tilt can only
//! ever move pitch and roll.
//!
//! Heading/pitch/roll composes as `Rz(heading) * Rx(pitch) * Ry(roll)`:
//! heading about world up, pitch about the vehicle's right axis, roll about its
//! forward axis.

use nalgebra::{Matrix3, Rotation3, Vector3};
use tracing::trace;

use crate::types::{try_unit, world_forward, world_right, world_up, Rotation, UnitVector, Vector};

/// Below this squared axis length the tilt is treated as identity.
const TILT_AXIS_EPSILON_SQ: f64 = 1e-10;
/// Below this squared length the projected forward is unusable.
const FORWARD_EPSILON_SQ: f64 = 1e-9;

/// Three mutually orthogonal unit axes of a vehicle, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationFrame {
    pub right: UnitVector,
    pub forward: UnitVector,
    pub up: UnitVector,
}

impl OrientationFrame {
    pub fn from_rotation(rotation: &Rotation) -> Self {
        Self {
            right: rotation * world_right(),
            forward: rotation * world_forward(),
            up: rotation * world_up(),
        }
    }

    /// The rotation taking world axes onto `{right, forward, up}`.
    pub fn to_rotation(&self) -> Rotation {
        let basis = Matrix3::from_columns(&[
            self.right.into_inner(),
            self.forward.into_inner(),
            self.up.into_inner(),
        ]);
        Rotation::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
    }
}

/// Heading, pitch and roll in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingPitchRoll {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl HeadingPitchRoll {
    pub fn to_rotation(&self) -> Rotation {
        Rotation::from_axis_angle(&Vector3::z_axis(), self.heading.to_radians())
            * Rotation::from_axis_angle(&Vector3::x_axis(), self.pitch.to_radians())
            * Rotation::from_axis_angle(&Vector3::y_axis(), self.roll.to_radians())
    }

    /// Decomposes `rotation`. Valid while |pitch| < 90°, which holds for any
    /// up vector the slope limiter lets through.
    pub fn from_rotation(rotation: &Rotation) -> Self {
        let m = rotation.to_rotation_matrix().into_inner();
        // Column 1 is forward: (-sin h cos p, cos h cos p, sin p).
        let pitch = num_traits::clamp(m[(2, 1)], -1.0, 1.0).asin();
        let heading = (-m[(0, 1)]).atan2(m[(1, 1)]);
        // Row 2 is (-cos p sin r, sin p, cos p cos r).
        let roll = (-m[(2, 0)]).atan2(m[(2, 2)]);
        Self {
            heading: heading.to_degrees(),
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
        }
    }
}

/// Heading of `rotation` in degrees, in `(-180, 180]`.
pub fn heading_of(rotation: &Rotation) -> f64 {
    HeadingPitchRoll::from_rotation(rotation).heading
}

/// Shortest-arc rotation carrying world up onto `up`.
///
/// Identity when `up` is already vertical, or exactly inverted, where the
/// axis is undefined.
pub fn tilt_from_world_up(up: &UnitVector) -> Rotation {
    let axis = world_up().cross(&up.into_inner());
    if axis.norm_squared() < TILT_AXIS_EPSILON_SQ {
        return Rotation::identity();
    }
    let angle = num_traits::clamp(world_up().dot(&up.into_inner()), -1.0, 1.0).acos();
    match try_unit(&axis) {
        Some(axis) => Rotation::from_axis_angle(&axis, angle),
        None => Rotation::identity(),
    }
}

/// Builds the vehicle orientation from the driver heading (degrees) and the
/// accepted up vector.
///
/// With `up` equal to world up this is exactly a heading rotation. For any
/// `up`, [`heading_of`] on the result returns `heading_deg` modulo 360.
pub fn build_orientation(heading_deg: f64, up: &UnitVector) -> Rotation {
    let tilted = tilted_frame(heading_deg, up);
    let hpr = HeadingPitchRoll::from_rotation(&tilted.to_rotation());
    HeadingPitchRoll {
        heading: heading_deg,
        ..hpr
    }
    .to_rotation()
}

/// Steps 1-5: yaw world forward, tilt it, and rebuild an exact orthonormal
/// frame around `up`. The heading channel of this frame is not yet pinned.
pub fn tilted_frame(heading_deg: f64, up: &UnitVector) -> OrientationFrame {
    let yaw = Rotation::from_axis_angle(&world_up(), heading_deg.to_radians());
    let yawed_forward = yaw * world_forward().into_inner();
    let tilted_forward = tilt_from_world_up(up) * yawed_forward;

    let up_v = up.into_inner();
    let mut forward = tilted_forward - up_v * tilted_forward.dot(&up_v);
    if forward.norm_squared() < FORWARD_EPSILON_SQ {
        trace!(heading_deg, "forward collinear with up, using fallback axis");
        forward = safe_forward(&up_v);
    }
    let forward = forward.normalize();

    let right = forward.cross(&up_v).normalize();
    let forward = up_v.cross(&right).normalize();

    OrientationFrame {
        right: UnitVector::new_unchecked(right),
        forward: UnitVector::new_unchecked(forward),
        up: *up,
    }
}

/// A horizontal forward guaranteed not to be parallel to `up`.
fn safe_forward(up: &Vector) -> Vector {
    let candidate = world_right().into_inner();
    let projected = candidate - up * candidate.dot(up);
    if projected.norm_squared() >= FORWARD_EPSILON_SQ {
        projected
    } else {
        let alt = world_forward().into_inner();
        alt - up * alt.dot(up)
    }
}
