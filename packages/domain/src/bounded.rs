//! Shared bounds for the pitch and rate multipliers.

/// Lower bound (inclusive).
pub const MIN: f32 = 0.5;
/// Upper bound (inclusive).
pub const MAX: f32 = 2.0;
/// Granularity exposed to sliders.
pub const STEP: f32 = 0.1;
/// Engine-neutral value.
pub const NEUTRAL: f32 = 1.0;

const STEPS_PER_UNIT: f32 = 10.0;

/// Clamp into `[MIN, MAX]` and snap to the nearest `STEP`.
///
/// Non-finite input maps to `NEUTRAL`.
pub(crate) fn snap(value: f32) -> f32 {
    if !value.is_finite() {
        return NEUTRAL;
    }
    let steps = (value.clamp(MIN, MAX) * STEPS_PER_UNIT).round();
    steps / STEPS_PER_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(snap(0.3), MIN);
        assert_eq!(snap(2.5), MAX);
        assert_eq!(snap(-4.0), MIN);
    }

    #[test]
    fn snaps_to_step() {
        assert!((snap(1.04) - 1.0).abs() < 1e-6);
        assert!((snap(1.26) - 1.3).abs() < 1e-6);
        assert_eq!(snap(1.5), 1.5);
        assert_eq!(snap(0.71), 0.7);
    }

    #[test]
    fn non_finite_is_neutral() {
        assert_eq!(snap(f32::NAN), NEUTRAL);
        assert_eq!(snap(f32::INFINITY), NEUTRAL);
        assert_eq!(snap(f32::NEG_INFINITY), NEUTRAL);
    }
}
