//! Continuous telemetry supplied by the simulator

use serde::{Deserialize, Serialize};

use crate::types::RobotId;

/// Battlefield dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSize {
    pub width: f64,
    pub height: f64,
}

impl ArenaSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for ArenaSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Own-robot state at the current tick.
///
/// Headings are in degrees, clockwise from north, in `[0, 360)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub x: f64,
    pub y: f64,
    pub energy: f64,
    pub heading: f64,
    pub gun_heading: f64,
}

/// One radar contact with another robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentScan {
    pub id: RobotId,
    /// Distance to the contact in pixels
    pub distance: f64,
    /// Bearing relative to our body heading, in `[0, 360)`
    pub bearing: f64,
    pub heading: f64,
    pub energy: f64,
}
