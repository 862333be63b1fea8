//! Coordinate axis conversion applied on import
//!
//! Source assets are authored with a different forward axis than the
//! target scene. The conversion is a single-axis sign flip applied to
//! every point position and bone bind translation. Flipping twice with
//! the same axis restores the original coordinates.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which axis to flip when converting imported coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisConversion {
    /// Leave coordinates untouched
    Identity,
    FlipX,
    /// Negate Y, the usual fix for the source format's handedness
    #[default]
    FlipY,
    FlipZ,
}

impl AxisConversion {
    /// Apply the conversion to a position or translation
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            AxisConversion::Identity => v,
            AxisConversion::FlipX => Vec3::new(-v.x, v.y, v.z),
            AxisConversion::FlipY => Vec3::new(v.x, -v.y, v.z),
            AxisConversion::FlipZ => Vec3::new(v.x, v.y, -v.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_positions_unchanged() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(AxisConversion::Identity.apply(v), v);
    }

    #[test]
    fn flip_is_an_involution() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        for axis in [
            AxisConversion::FlipX,
            AxisConversion::FlipY,
            AxisConversion::FlipZ,
        ] {
            assert_eq!(axis.apply(axis.apply(v)), v);
        }
    }

    #[test]
    fn default_flips_y() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(AxisConversion::default().apply(v), Vec3::new(1.0, -2.0, 3.0));
    }
}
