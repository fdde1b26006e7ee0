// trackline_core/src/input.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ControlParseError;

/// A discrete, named driver control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Control {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Accelerate,
        Control::Brake,
        Control::SteerLeft,
        Control::SteerRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Accelerate => "accelerate",
            Control::Brake => "brake",
            Control::SteerLeft => "steer_left",
            Control::SteerRight => "steer_right",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Control {
    type Err = ControlParseError;

    /// Accepts the canonical names plus the arrow-key names `up`, `down`,
    /// `left` and `right`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accelerate" | "up" => Ok(Control::Accelerate),
            "brake" | "down" => Ok(Control::Brake),
            "steer_left" | "left" => Ok(Control::SteerLeft),
            "steer_right" | "right" => Ok(Control::SteerRight),
            _ => Err(ControlParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Control {
    type Error = ControlParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Control> for String {
    fn from(value: Control) -> Self {
        value.as_str().to_string()
    }
}

/// Held state of every control, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl DriveInput {
    /// Builds the input from a control map. Missing controls count as released.
    pub fn from_held(held: &HashMap<Control, bool>) -> Self {
        let is_held = |control| held.get(&control).copied().unwrap_or(false);
        Self {
            accelerate: is_held(Control::Accelerate),
            brake: is_held(Control::Brake),
            steer_left: is_held(Control::SteerLeft),
            steer_right: is_held(Control::SteerRight),
        }
    }

    /// Builds the input from the set of controls currently held.
    pub fn from_controls<'a>(controls: impl IntoIterator<Item = &'a Control>) -> Self {
        let mut input = Self::default();
        for control in controls {
            input.set(*control, true);
        }
        input
    }

    pub fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Accelerate => self.accelerate = held,
            Control::Brake => self.brake = held,
            Control::SteerLeft => self.steer_left = held,
            Control::SteerRight => self.steer_right = held,
        }
    }

    /// Signed steering: `+1` left, `-1` right, `0` for none or both.
    pub fn steer(&self) -> f64 {
        let left = if self.steer_left { 1.0 } else { 0.0 };
        let right = if self.steer_right { -1.0 } else { 0.0 };
        left + right
    }
}
