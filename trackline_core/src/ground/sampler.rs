// trackline_core/src/ground/sampler.rs

use crate::config::GroundParams;
use crate::terrain::TerrainQuery;
use crate::types::{face_up, try_unit, world_up, Point, Rotation, UnitVector, Vector};

/// One downward probe and what it found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSample {
    /// World-space start of the probe ray.
    pub origin: Point,
    /// Nearest terrain hit, if any.
    pub hit_point: Option<Point>,
    /// Unit hit normal, flipped to face up. Absent on a miss or a zero normal.
    pub hit_normal: Option<UnitVector>,
    /// Hit exists and the normal is upward-facing enough to count as ground.
    pub valid: bool,
}

/// Vehicle-local probe offsets: front-left, front-right, rear-center.
///
/// Local axes are `+X` right, `+Y` forward, `+Z` up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeLayout {
    pub offsets: [Vector; 3],
}

impl ProbeLayout {
    pub fn new(params: &GroundParams, half_width: f64, half_length: f64) -> Self {
        let lateral = half_width * params.sample_width_fraction;
        let ahead = half_length * params.sample_forward_fraction;
        let behind = half_length * params.sample_rear_fraction;
        Self {
            offsets: [
                Vector::new(-lateral, ahead, 0.0),
                Vector::new(lateral, ahead, 0.0),
                Vector::new(0.0, -behind, 0.0),
            ],
        }
    }
}

/// Casts every probe of `layout` and classifies the hits. Pure query.
pub fn sample_ground<T: TerrainQuery + ?Sized>(
    terrain: &T,
    position: &Point,
    orientation: &Rotation,
    layout: &ProbeLayout,
    params: &GroundParams,
) -> [GroundSample; 3] {
    let lift = world_up().into_inner() * params.ray_height;
    let drop = world_up().into_inner() * params.ray_length;

    layout.offsets.map(|offset| {
        let origin = position + orientation * offset + lift;
        let target = origin - drop;
        classify(origin, terrain.cast_ray(&origin, &target), params.ground_z_min)
    })
}

fn classify(
    origin: Point,
    hit: Option<crate::terrain::RayHit>,
    ground_z_min: f64,
) -> GroundSample {
    let Some(hit) = hit else {
        return GroundSample {
            origin,
            hit_point: None,
            hit_normal: None,
            valid: false,
        };
    };

    let hit_normal = try_unit(&hit.normal).map(face_up);
    let valid = hit_normal.is_some_and(|n| n.z >= ground_z_min);
    GroundSample {
        origin,
        hit_point: Some(hit.point),
        hit_normal,
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::RayHit;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    /// Flat plane at a fixed height that records every ray it was asked about.
    struct RecordingPlane {
        z: f64,
        normal: Vector,
        rays: RefCell<Vec<(Point, Point)>>,
    }

    impl TerrainQuery for RecordingPlane {
        fn cast_ray(&self, origin: &Point, target: &Point) -> Option<RayHit> {
            self.rays.borrow_mut().push((*origin, *target));
            (origin.z >= self.z && target.z <= self.z).then(|| RayHit {
                point: Point::new(origin.x, origin.y, self.z),
                normal: self.normal,
            })
        }
    }

    fn plane(z: f64, normal: Vector) -> RecordingPlane {
        RecordingPlane {
            z,
            normal,
            rays: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn probes_follow_vehicle_heading() {
        let params = GroundParams::default();
        let layout = ProbeLayout::new(&params, 1.0, 2.0);
        let terrain = plane(0.0, Vector::z());
        let heading = Rotation::from_axis_angle(&world_up(), 90f64.to_radians());

        let samples = sample_ground(&terrain, &Point::new(0.0, 0.0, 1.0), &heading, &layout, &params);

        // Rear-center at 0.6 * 2.0 behind; facing -X, behind is +X.
        assert_relative_eq!(samples[2].origin, Point::new(1.2, 0.0, 5.0), epsilon = 1e-12);
        let (origin, target) = terrain.rays.borrow()[2];
        assert_relative_eq!(origin.z - target.z, params.ray_length, epsilon = 1e-12);
        assert!(samples.iter().all(|s| s.valid));
    }

    #[test]
    fn downward_normals_are_flipped() {
        let params = GroundParams::default();
        let layout = ProbeLayout::new(&params, 1.0, 2.0);
        let terrain = plane(0.0, Vector::new(0.0, 0.0, -2.0));
        let samples = sample_ground(&terrain, &Point::origin(), &Rotation::identity(), &layout, &params);

        for sample in samples {
            assert!(sample.valid);
            assert_relative_eq!(sample.hit_normal.unwrap().into_inner(), Vector::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn wall_hits_are_invalid() {
        let params = GroundParams::default();
        let layout = ProbeLayout::new(&params, 1.0, 2.0);
        // 80 degrees from vertical: z component ~0.17, below the 0.25 threshold.
        let wall = Vector::new(80f64.to_radians().sin(), 0.0, 80f64.to_radians().cos());
        let terrain = plane(0.0, wall);
        let samples = sample_ground(&terrain, &Point::origin(), &Rotation::identity(), &layout, &params);

        assert!(samples.iter().all(|s| s.hit_point.is_some() && !s.valid));
    }

    #[test]
    fn misses_yield_no_hit() {
        let params = GroundParams::default();
        let layout = ProbeLayout::new(&params, 1.0, 2.0);
        // Plane far below the end of every probe.
        let terrain = plane(-100.0, Vector::z());
        let samples = sample_ground(&terrain, &Point::origin(), &Rotation::identity(), &layout, &params);

        assert!(samples
            .iter()
            .all(|s| s.hit_point.is_none() && s.hit_normal.is_none() && !s.valid));
    }
}
