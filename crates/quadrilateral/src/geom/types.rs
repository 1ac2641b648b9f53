//! Basic 2D types and tolerances.
//!
//! - `Point2`: positions and displacements share one vector type.
//! - `Tolerances`: centralizes the epsilons used by classification and the
//!   validity checks.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg;

/// Position or displacement in model coordinates (y up).
pub type Point2 = Vector2<f64>;

/// Comparison tolerances.
///
/// Every angle/length comparison downstream routes through `nearly_equal` with
/// one of these values, so a single `Tolerances` gives one consistent answer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Slack for angle equality (radians).
    pub angle_eps: f64,
    /// Slack for length equality (model units).
    pub length_eps: f64,
    /// Minimum side length; shorter sides mean coincident vertices.
    pub min_side_length: f64,
    /// Minimum enclosed area.
    pub min_area: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            angle_eps: cfg::ANGLE_EPS,
            length_eps: cfg::LENGTH_EPS,
            min_side_length: cfg::MIN_SIDE_LENGTH,
            min_area: cfg::MIN_AREA,
        }
    }
}

impl Tolerances {
    /// Looser comparison slack for samples from the physical-device bridge.
    pub fn device() -> Self {
        Self {
            angle_eps: cfg::DEVICE_ANGLE_EPS,
            length_eps: cfg::DEVICE_LENGTH_EPS,
            ..Self::default()
        }
    }
}
