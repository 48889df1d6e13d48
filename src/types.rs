//! Newtype wrappers and small numeric helpers shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the simulator assigns to every robot in a battle.
///
/// Ordering is used as the deterministic tie-break when two scanned
/// opponents are equally near.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(u32);

impl RobotId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for RobotId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Normalise an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Normalise an angle in degrees to `(-180, 180]`, the shortest turn.
pub fn relative_degrees(degrees: f64) -> f64 {
    let normalized = normalize_degrees(degrees);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Bitwise equality for floats: `NaN == NaN` and `0.0 != -0.0`.
pub(crate) fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-15) < 360.0);
    }

    #[test]
    fn test_relative_degrees() {
        assert_eq!(relative_degrees(90.0), 90.0);
        assert_eq!(relative_degrees(270.0), -90.0);
        assert_eq!(relative_degrees(180.0), 180.0);
        assert_eq!(relative_degrees(-540.0), 180.0);
    }

    #[test]
    fn test_same_bits() {
        assert!(same_bits(1.5, 1.5));
        assert!(same_bits(f64::NAN, f64::NAN));
        assert!(!same_bits(0.0, -0.0));
    }

    #[test]
    fn test_robot_id_ordering() {
        assert!(RobotId::new(1) < RobotId::new(2));
        assert_eq!(RobotId::from(7).to_string(), "#7");
    }
}
