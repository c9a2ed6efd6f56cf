//! Pitch multiplier (1.0 = the voice's natural pitch).
use serde::{Deserialize, Serialize};

use crate::bounded;

/// Pitch multiplier, always within `[0.5, 2.0]` on a 0.1 grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct VocalPitchMod(f32);

impl VocalPitchMod {
    /// Lowest supported pitch.
    pub const MIN: Self = Self(bounded::MIN);
    /// Highest supported pitch.
    pub const MAX: Self = Self(bounded::MAX);
    /// Natural pitch.
    pub const NATURAL: Self = Self(bounded::NEUTRAL);
    /// Slider granularity.
    pub const STEP: f32 = bounded::STEP;

    /// Create a pitch, clamping and snapping `value`.
    pub fn new(value: f32) -> Self {
        Self(bounded::snap(value))
    }

    /// Get the pitch multiplier.
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for VocalPitchMod {
    fn default() -> Self {
        Self::NATURAL
    }
}

impl From<f32> for VocalPitchMod {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<VocalPitchMod> for f32 {
    fn from(pitch: VocalPitchMod) -> Self {
        pitch.0
    }
}
