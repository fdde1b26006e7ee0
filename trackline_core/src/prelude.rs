// trackline_core/src/prelude.rs

// --- Pipeline entry point ---
pub use crate::vehicle::{FrameOutput, Vehicle};

// --- Parameters and errors ---
pub use crate::config::{DriveParams, GroundParams, VehicleParams};
pub use crate::error::{ConfigError, ControlParseError, GeometryError};

// --- Data passed across the terrain seam ---
pub use crate::terrain::{RayHit, TerrainQuery, TrackGeometry};

// --- Per-frame values ---
pub use crate::input::{Control, DriveInput};
pub use crate::orientation::{build_orientation, heading_of, HeadingPitchRoll, OrientationFrame};
pub use crate::state::VehicleState;
pub use crate::types::{Point, Rotation, UnitVector, Vector};
