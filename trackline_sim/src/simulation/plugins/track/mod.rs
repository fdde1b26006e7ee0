// trackline_sim/src/simulation/plugins/track/mod.rs

//! Builds the static track once at startup and exposes it to the vehicle
//! pipeline as a `TerrainQuery`.
//!
//! The collider lives in ENU coordinates, the same space the pipeline works
//! in. It is never handed to the physics schedule; probes query it directly.

pub mod generators;

use avian3d::prelude::{Collider, Position, Rotation};
use bevy::prelude::*;
use rand::Rng;
use trackline_core::terrain::{RayHit, TerrainQuery, TrackGeometry};
use trackline_core::types::{Point, Vector};

use crate::simulation::config::{ScenarioConfig, TrackConfig};
use crate::simulation::core::error::SimError;
use crate::simulation::core::prng::SimulationRng;

// =========================================================================
// == Resource & Plugin ==
// =========================================================================

/// The immutable static collider for the whole track.
#[derive(Resource)]
pub struct TrackCollider {
    collider: Collider,
    triangles: usize,
}

impl TrackCollider {
    pub fn from_geometry(geometry: &TrackGeometry) -> Result<Self, SimError> {
        if geometry.is_empty() {
            return Err(SimError::EmptyTrack);
        }
        let vertices = geometry.vertices().iter().map(point_to_vec3).collect();
        let indices = geometry.indices().to_vec();
        Ok(Self {
            collider: Collider::trimesh(vertices, indices),
            triangles: geometry.triangle_count(),
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles
    }
}

impl TerrainQuery for TrackCollider {
    fn cast_ray(&self, origin: &Point, target: &Point) -> Option<RayHit> {
        let delta = target - origin;
        let length = delta.norm();
        if !length.is_finite() || length <= f64::EPSILON {
            return None;
        }
        let direction = delta / length;

        let (distance, normal) = self.collider.cast_ray(
            Position::default(),
            Rotation::default(),
            point_to_vec3(origin),
            vector_to_vec3(&direction),
            length as f32,
            true,
        )?;

        Some(RayHit {
            point: origin + direction * distance as f64,
            normal: Vector::new(normal.x as f64, normal.y as f64, normal.z as f64),
        })
    }
}

pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, build_track_collider);
    }
}

// =========================================================================
// == Building ==
// =========================================================================

/// Generates every configured part and bakes it into world space.
pub fn build_track_geometry<R: Rng + ?Sized>(
    track: &TrackConfig,
    rng: &mut R,
) -> Result<TrackGeometry, SimError> {
    let to_world = track.to_world();
    let mut geometry = TrackGeometry::new();
    for part in &track.parts {
        let mesh = generators::generate(&part.shape, rng)?;
        geometry.add_part(&mesh.vertices, &mesh.indices, &(to_world * part.pose()))?;
        debug!(
            "  -> Baked {} part with {} triangles",
            part.shape.type_str(),
            mesh.indices.len()
        );
    }
    Ok(geometry)
}

/// STARTUP: builds the collider resource, or stops the app if the track is
/// unusable.
fn build_track_collider(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    mut rng: ResMut<SimulationRng>,
    mut exit: EventWriter<AppExit>,
) {
    let collider = build_track_geometry(&config.track, &mut rng.0)
        .and_then(|geometry| TrackCollider::from_geometry(&geometry));
    match collider {
        Ok(collider) => {
            info!(
                "Track ready: {} parts, {} triangles",
                config.track.parts.len(),
                collider.triangle_count()
            );
            commands.insert_resource(collider);
        }
        Err(e) => {
            error!("Failed to build track: {}", e);
            exit.write(AppExit::error());
        }
    }
}

fn point_to_vec3(p: &Point) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
}

fn vector_to_vec3(v: &Vector) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}
