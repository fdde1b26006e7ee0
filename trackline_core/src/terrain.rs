// trackline_core/src/terrain.rs

//! The terrain capability consumed by the ground sampler, and the baked
//! triangle soup the surrounding application builds its collider from.

use nalgebra::Similarity3;

use crate::error::GeometryError;
use crate::types::{Point, Vector};

/// The nearest intersection of a probe ray with the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Point,
    /// Surface normal at the hit. Not required to be unit length or to face up.
    pub normal: Vector,
}

/// The contract for anything that can answer a probe ray against static terrain.
///
/// Implementations cast a segment from `origin` to `target` and return the
/// nearest hit, or `None` on a miss. Queries are synchronous and must be cheap;
/// the whole frame waits on them.
pub trait TerrainQuery {
    fn cast_ray(&self, origin: &Point, target: &Point) -> Option<RayHit>;
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn cast_ray(&self, origin: &Point, target: &Point) -> Option<RayHit> {
        (**self).cast_ray(origin, target)
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for Box<T> {
    fn cast_ray(&self, origin: &Point, target: &Point) -> Option<RayHit> {
        (**self).cast_ray(origin, target)
    }
}

/// Track triangles in world space.
///
/// Each part is baked with its accumulated world transform as it is added, so
/// the finished buffers can be handed straight to a static collider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackGeometry {
    vertices: Vec<Point>,
    indices: Vec<[u32; 3]>,
}

impl TrackGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one mesh part. Vertices are scaled, rotated, then translated by
    /// `to_world`; indices are offset past the vertices already present.
    pub fn add_part(
        &mut self,
        vertices: &[Point],
        indices: &[[u32; 3]],
        to_world: &Similarity3<f64>,
    ) -> Result<(), GeometryError> {
        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(GeometryError::IndexOutOfRange {
                    triangle,
                    index,
                    len: vertices.len(),
                });
            }
        }

        let offset = self.vertices.len();
        let max = u32::MAX as usize;
        if offset + vertices.len() > max {
            return Err(GeometryError::TooManyVertices { max });
        }
        let offset = offset as u32;

        self.vertices
            .extend(vertices.iter().map(|v| to_world.transform_point(v)));
        self.indices.extend(
            indices
                .iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
        Ok(())
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned `(min, max)` corners of all vertices, if any.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(v), hi.sup(v))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};
    use std::f64::consts::FRAC_PI_2;

    fn unit_quad() -> (Vec<Point>, Vec<[u32; 3]>) {
        (
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn baking_scales_then_rotates_then_translates() {
        let (vertices, indices) = unit_quad();
        let to_world = Similarity3::from_parts(
            Translation3::new(10.0, 0.0, 1.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            2.0,
        );

        let mut geometry = TrackGeometry::new();
        geometry.add_part(&vertices, &indices, &to_world).unwrap();

        // (1, 0, 0) -> scaled (2, 0, 0) -> rotated (0, 2, 0) -> translated (10, 2, 1)
        assert_relative_eq!(
            geometry.vertices()[1],
            Point::new(10.0, 2.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn later_parts_get_offset_indices() {
        let (vertices, indices) = unit_quad();
        let mut geometry = TrackGeometry::new();
        geometry
            .add_part(&vertices, &indices, &Similarity3::identity())
            .unwrap();
        geometry
            .add_part(&vertices, &indices, &Similarity3::identity())
            .unwrap();

        assert_eq!(geometry.triangle_count(), 4);
        assert_eq!(geometry.indices()[2], [4, 5, 6]);
        assert_eq!(geometry.indices()[3], [4, 6, 7]);
    }

    #[test]
    fn out_of_range_index_is_rejected_and_nothing_is_added() {
        let (vertices, _) = unit_quad();
        let mut geometry = TrackGeometry::new();
        let err = geometry
            .add_part(&vertices, &[[0, 1, 9]], &Similarity3::identity())
            .unwrap_err();

        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                triangle: 0,
                index: 9,
                len: 4
            }
        );
        assert!(geometry.is_empty());
        assert!(geometry.bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let (vertices, indices) = unit_quad();
        let mut geometry = TrackGeometry::new();
        geometry
            .add_part(&vertices, &indices, &Similarity3::identity())
            .unwrap();
        let (lo, hi) = geometry.bounds().unwrap();
        assert_eq!(lo, Point::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Point::new(1.0, 1.0, 0.0));
    }
}
