// trackline_sim/src/simulation/config/structs.rs

use bevy::prelude::Resource;
use nalgebra::{Similarity3, Translation3};
use serde::{Deserialize, Serialize};
use trackline_core::config::{DriveParams, GroundParams, VehicleParams};
use trackline_core::orientation::HeadingPitchRoll;

use crate::simulation::core::error::SimError;

/// Upper bound on grid cells per side; keeps one part well inside `u32` indices.
pub const MAX_GRID_RESOLUTION: u32 = 1024;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # ScenarioConfig
/// Everything a run needs, parsed from a scenario TOML file. Every section is
/// optional and falls back to its defaults.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub vehicle: VehicleParams,

    #[serde(default)]
    pub drive: DriveParams,

    #[serde(default)]
    pub ground: GroundParams,

    #[serde(default)]
    pub track: TrackConfig,

    // `[[script]]` in TOML.
    #[serde(default)]
    pub script: Vec<ScriptSegment>,
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.simulation.validate()?;
        self.vehicle.validate()?;
        self.drive.validate()?;
        self.ground.validate()?;
        self.track.validate()?;
        for segment in &self.script {
            non_negative("script.duration_seconds", segment.duration_seconds)?;
        }
        Ok(())
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Fixed pipeline rate in Hz.
    pub tick_hz: f64,
    /// Simulated time before the run stops.
    pub duration_seconds: f64,
    /// Report the vehicle state every this many ticks. `0` silences it.
    pub log_every_n_ticks: u32,
    /// Seed for the random track features.
    pub seed: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            duration_seconds: 10.0,
            log_every_n_ticks: 60,
            seed: 0,
        }
    }
}

impl SimulationSection {
    fn validate(&self) -> Result<(), SimError> {
        positive("simulation.tick_hz", self.tick_hz)?;
        non_negative("simulation.duration_seconds", self.duration_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// Uniform scale applied on top of every part's own pose.
    pub scale: f64,
    // `[[track.parts]]` in TOML.
    pub parts: Vec<TrackPartConfig>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            scale: 20.0,
            parts: vec![TrackPartConfig::new(PartShape::Flat {
                size: [100.0, 100.0],
                resolution: 1,
            })],
        }
    }
}

impl TrackConfig {
    fn validate(&self) -> Result<(), SimError> {
        positive("track.scale", self.scale)?;
        self.parts.iter().try_for_each(TrackPartConfig::validate)
    }

    /// The track-wide transform every part is placed under.
    pub fn to_world(&self) -> Similarity3<f64> {
        Similarity3::from_scaling(self.scale)
    }
}

/// One generated mesh piece and where it sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackPartConfig {
    pub shape: PartShape,
    /// Offset in track units, before the track scale.
    #[serde(default)]
    pub translation: [f64; 3],
    /// `[heading, pitch, roll]` in degrees.
    #[serde(default)]
    pub rotation_deg: [f64; 3],
    #[serde(default = "default_part_scale")]
    pub scale: f64,
}

fn default_part_scale() -> f64 {
    1.0
}

impl TrackPartConfig {
    pub fn new(shape: PartShape) -> Self {
        Self {
            shape,
            translation: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: default_part_scale(),
        }
    }

    fn validate(&self) -> Result<(), SimError> {
        positive("track.parts.scale", self.scale)?;
        self.shape.validate()
    }

    /// The part's own placement inside the track.
    pub fn pose(&self) -> Similarity3<f64> {
        let [x, y, z] = self.translation;
        let [heading, pitch, roll] = self.rotation_deg;
        let rotation = HeadingPitchRoll {
            heading,
            pitch,
            roll,
        }
        .to_rotation();
        Similarity3::from_parts(Translation3::new(x, y, z), rotation, self.scale)
    }
}

/// Procedural mesh kinds. Grid shapes are centered on the part origin and
/// span `size = [width_x, length_y]`, with `resolution` cells per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "PascalCase")]
pub enum PartShape {
    Flat {
        size: [f64; 2],
        resolution: u32,
    },
    /// Climbs `grade_deg` along +Y, starting at height zero on the rear edge.
    Ramp {
        size: [f64; 2],
        resolution: u32,
        grade_deg: f64,
    },
    /// Product of sines in X and Y.
    Hills {
        size: [f64; 2],
        resolution: u32,
        amplitude: f64,
        wavelength: f64,
    },
    /// Independent bumps per grid vertex, normally distributed.
    Rough {
        size: [f64; 2],
        resolution: u32,
        amplitude: f64,
    },
    /// Vertical panel in the XZ plane, `size = [width, height]`.
    Wall { size: [f64; 2] },
}

impl PartShape {
    pub fn type_str(&self) -> &'static str {
        match self {
            PartShape::Flat { .. } => "Flat",
            PartShape::Ramp { .. } => "Ramp",
            PartShape::Hills { .. } => "Hills",
            PartShape::Rough { .. } => "Rough",
            PartShape::Wall { .. } => "Wall",
        }
    }

    fn validate(&self) -> Result<(), SimError> {
        match self {
            PartShape::Flat { size, resolution } => grid(size, *resolution),
            PartShape::Ramp {
                size,
                resolution,
                grade_deg,
            } => {
                grid(size, *resolution)?;
                if !grade_deg.is_finite() || grade_deg.abs() >= 90.0 {
                    return Err(SimError::InvalidSetting {
                        name: "Ramp.grade_deg",
                        value: *grade_deg,
                    });
                }
                Ok(())
            }
            PartShape::Hills {
                size,
                resolution,
                amplitude,
                wavelength,
            } => {
                grid(size, *resolution)?;
                finite("Hills.amplitude", *amplitude)?;
                positive("Hills.wavelength", *wavelength)
            }
            PartShape::Rough {
                size,
                resolution,
                amplitude,
            } => {
                grid(size, *resolution)?;
                non_negative("Rough.amplitude", *amplitude)
            }
            PartShape::Wall { size } => {
                positive("Wall.width", size[0])?;
                positive("Wall.height", size[1])
            }
        }
    }
}

/// A span of scripted driving. Controls not listed are released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptSegment {
    pub duration_seconds: f64,
    /// Control names: `accelerate`, `brake`, `steer_left`, `steer_right`, or
    /// the arrow aliases `up`, `down`, `left`, `right`.
    #[serde(default)]
    pub hold: Vec<String>,
}

// --- Range checks ---

fn grid(size: &[f64; 2], resolution: u32) -> Result<(), SimError> {
    positive("size.x", size[0])?;
    positive("size.y", size[1])?;
    if resolution == 0 || resolution > MAX_GRID_RESOLUTION {
        return Err(SimError::InvalidSetting {
            name: "resolution",
            value: resolution as f64,
        });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSetting { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSetting { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidSetting { name, value })
    }
}
