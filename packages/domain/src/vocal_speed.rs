//! Speaking rate multiplier (1.0 = normal).
use serde::{Deserialize, Serialize};

use crate::bounded;

/// Rate multiplier, always within `[0.5, 2.0]` on a 0.1 grid.
///
/// Out-of-range input is clamped rather than rejected, so every value that
/// reaches a host engine is valid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct VocalSpeedMod(f32);

impl VocalSpeedMod {
    /// Slowest supported rate.
    pub const MIN: Self = Self(bounded::MIN);
    /// Fastest supported rate.
    pub const MAX: Self = Self(bounded::MAX);
    /// Normal speaking rate.
    pub const NORMAL: Self = Self(bounded::NEUTRAL);
    /// Slider granularity.
    pub const STEP: f32 = bounded::STEP;

    /// Create a rate, clamping and snapping `value`.
    pub fn new(value: f32) -> Self {
        Self(bounded::snap(value))
    }

    /// Get the rate multiplier.
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for VocalSpeedMod {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<f32> for VocalSpeedMod {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<VocalSpeedMod> for f32 {
    fn from(rate: VocalSpeedMod) -> Self {
        rate.0
    }
}
