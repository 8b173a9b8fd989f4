//! Wave field evaluation parameters.

use crate::error::{Result, WaveError};

/// How each wave contributes to the displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplacementMode {
    /// Vertical-only sum of sines (no horizontal bunching)
    SumOfSines,

    /// Gerstner waves: points orbit, sharpening crests and widening troughs
    #[default]
    Gerstner,
}

/// Policy for mapping the frame clock onto evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeWrap {
    /// Use elapsed time as-is; precision degrades over long runs
    #[default]
    Unbounded,

    /// Wrap time modulo a loop period (seconds).
    /// Phase speeds are snapped so every wave completes whole cycles per loop.
    Loop { period_s: f32 },
}

impl TimeWrap {
    pub fn validate(&self) -> Result<()> {
        match *self {
            TimeWrap::Unbounded => Ok(()),
            TimeWrap::Loop { period_s } if period_s.is_finite() && period_s > 0.0 => Ok(()),
            TimeWrap::Loop { period_s } => Err(WaveError::invalid(format!(
                "loop period must be > 0 seconds, got {}",
                period_s
            ))),
        }
    }
}

/// Wave field evaluation settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldParams {
    pub mode: DisplacementMode,
    pub time_wrap: TimeWrap,
}
