// trackline_sim/src/simulation/plugins/track/generators.rs

//! Procedural track pieces, generated in part-local coordinates (Z up).

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use trackline_core::types::Point;

use crate::simulation::config::PartShape;
use crate::simulation::core::error::SimError;

/// Vertex and triangle buffers for one part, before baking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartMesh {
    pub vertices: Vec<Point>,
    pub indices: Vec<[u32; 3]>,
}

/// Builds the mesh for `shape`. Only `Rough` draws from `rng`.
pub fn generate<R: Rng + ?Sized>(shape: &PartShape, rng: &mut R) -> Result<PartMesh, SimError> {
    let mesh = match *shape {
        PartShape::Flat { size, resolution } => heightfield(size, resolution, |_, _| 0.0),
        PartShape::Ramp {
            size,
            resolution,
            grade_deg,
        } => {
            let rise = grade_deg.to_radians().tan();
            let rear = -0.5 * size[1];
            heightfield(size, resolution, |_, y| (y - rear) * rise)
        }
        PartShape::Hills {
            size,
            resolution,
            amplitude,
            wavelength,
        } => heightfield(size, resolution, |x, y| {
            amplitude * (TAU * x / wavelength).sin() * (TAU * y / wavelength).sin()
        }),
        PartShape::Rough {
            size,
            resolution,
            amplitude,
        } => {
            let bumps = Normal::new(0.0, amplitude).map_err(|_| SimError::InvalidSetting {
                name: "Rough.amplitude",
                value: amplitude,
            })?;
            heightfield(size, resolution, |_, _| bumps.sample(rng))
        }
        PartShape::Wall { size } => wall(size[0], size[1]),
    };
    Ok(mesh)
}

/// A centered grid of `resolution x resolution` cells with heights from
/// `height(x, y)`, wound counter-clockwise seen from above.
pub fn heightfield(
    size: [f64; 2],
    resolution: u32,
    mut height: impl FnMut(f64, f64) -> f64,
) -> PartMesh {
    let cells = resolution.max(1);
    let side = cells + 1;
    let [width, length] = size;

    let mut vertices = Vec::with_capacity((side * side) as usize);
    for j in 0..side {
        let y = length * (j as f64 / cells as f64 - 0.5);
        for i in 0..side {
            let x = width * (i as f64 / cells as f64 - 0.5);
            vertices.push(Point::new(x, y, height(x, y)));
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 2) as usize);
    for j in 0..cells {
        for i in 0..cells {
            let v00 = j * side + i;
            let v10 = v00 + 1;
            let v01 = v00 + side;
            let v11 = v01 + 1;
            indices.push([v00, v10, v11]);
            indices.push([v00, v11, v01]);
        }
    }

    PartMesh { vertices, indices }
}

/// A vertical panel standing on the X axis, facing -Y.
pub fn wall(width: f64, height: f64) -> PartMesh {
    let half = 0.5 * width;
    PartMesh {
        vertices: vec![
            Point::new(-half, 0.0, 0.0),
            Point::new(half, 0.0, 0.0),
            Point::new(half, 0.0, height),
            Point::new(-half, 0.0, height),
        ],
        indices: vec![[0, 1, 2], [0, 2, 3]],
    }
}
