// trackline_sim/src/simulation/core/transforms.rs

//! The pipeline works in ENU (X east/right, Y north/forward, Z up). Bevy is
//! Y up with -Z forward. Everything crossing into a `Transform` goes through
//! here.

use bevy::prelude::{Quat as BevyQuat, Transform as BevyTransform, Vec3 as BevyVec3};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

// --- ENU <-> BEVY frame ---

/// Rotation taking ENU basis vectors to their Bevy equivalents: a -90 degree
/// turn about the shared X axis. ENU Y (north) lands on Bevy -Z, ENU Z (up) on
/// Bevy Y.
pub fn enu_frame_to_bevy_frame() -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2)
}

/// Converts a direction or offset from ENU to Bevy world.
pub fn enu_vector_to_bevy_vector(enu: &Vector3<f64>) -> BevyVec3 {
    BevyVec3::new(
        enu.x as f32,  // East -> Bevy X
        enu.z as f32,  // Up -> Bevy Y
        -enu.y as f32, // North -> Bevy -Z
    )
}

pub fn enu_point_to_bevy_point(enu: &Point3<f64>) -> BevyVec3 {
    enu_vector_to_bevy_vector(&enu.coords)
}

/// Converts an orientation expressed in ENU into the same physical
/// orientation expressed in Bevy's frame.
pub fn enu_quat_to_bevy_quat(enu: &UnitQuaternion<f64>) -> BevyQuat {
    let frame = enu_frame_to_bevy_frame();
    let bevy = frame * enu * frame.inverse();
    BevyQuat::from_xyzw(
        bevy.coords.x as f32,
        bevy.coords.y as f32,
        bevy.coords.z as f32,
        bevy.coords.w as f32,
    )
}

/// A vehicle pose in ENU, as the `Transform` a renderer would draw.
pub fn enu_pose_to_bevy_transform(
    position: &Point3<f64>,
    rotation: &UnitQuaternion<f64>,
    scale: f64,
) -> BevyTransform {
    BevyTransform {
        translation: enu_point_to_bevy_point(position),
        rotation: enu_quat_to_bevy_quat(rotation),
        scale: BevyVec3::splat(scale as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI as PI_F32;
    use std::f64::consts::PI as PI_F64;

    const F32_EPSILON: f32 = 1e-5;

    fn assert_bevy_quat_approx_eq(q1: &BevyQuat, q2: &BevyQuat) {
        // q and -q are the same rotation.
        let dot = q1.dot(*q2);
        assert!(
            dot.abs() > 1.0 - F32_EPSILON,
            "quats differ: {q1:?} vs {q2:?}, dot {dot}"
        );
    }

    fn assert_bevy_vec3_approx_eq(v1: BevyVec3, v2: BevyVec3) {
        assert_abs_diff_eq!(v1.x, v2.x, epsilon = F32_EPSILON);
        assert_abs_diff_eq!(v1.y, v2.y, epsilon = F32_EPSILON);
        assert_abs_diff_eq!(v1.z, v2.z, epsilon = F32_EPSILON);
    }

    #[test]
    fn enu_axes_land_on_bevy_axes() {
        assert_bevy_vec3_approx_eq(
            enu_vector_to_bevy_vector(&Vector3::new(1.0, 2.0, 3.0)),
            BevyVec3::new(1.0, 3.0, -2.0),
        );
        // The explicit swizzle and the frame rotation agree.
        let v = Vector3::new(0.3, -1.2, 4.0);
        let rotated = enu_frame_to_bevy_frame() * v;
        assert_bevy_vec3_approx_eq(
            enu_vector_to_bevy_vector(&v),
            BevyVec3::new(rotated.x as f32, rotated.y as f32, rotated.z as f32),
        );
    }

    #[test]
    fn identity_stays_identity() {
        assert_bevy_quat_approx_eq(
            &enu_quat_to_bevy_quat(&UnitQuaternion::identity()),
            &BevyQuat::IDENTITY,
        );
    }

    #[test]
    fn enu_heading_is_bevy_yaw() {
        let heading = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI_F64 / 2.0);
        assert_bevy_quat_approx_eq(
            &enu_quat_to_bevy_quat(&heading),
            &BevyQuat::from_rotation_y(PI_F32 / 2.0),
        );
    }

    #[test]
    fn enu_pitch_is_bevy_pitch() {
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI_F64 / 6.0);
        assert_bevy_quat_approx_eq(
            &enu_quat_to_bevy_quat(&pitch),
            &BevyQuat::from_rotation_x(PI_F32 / 6.0),
        );
    }

    #[test]
    fn vehicle_forward_points_down_bevy_negative_z() {
        let transform = enu_pose_to_bevy_transform(
            &Point3::new(1.0, 2.0, 0.5),
            &UnitQuaternion::identity(),
            0.45,
        );
        assert_bevy_vec3_approx_eq(transform.translation, BevyVec3::new(1.0, 0.5, -2.0));
        assert_bevy_vec3_approx_eq(transform.scale, BevyVec3::splat(0.45));
        // ENU forward (+Y) expressed in Bevy.
        let forward = transform.rotation * enu_vector_to_bevy_vector(&Vector3::y());
        assert_bevy_vec3_approx_eq(forward, BevyVec3::NEG_Z);
    }
}
