//! Frame clock to evaluation time mapping.

use crate::params::TimeWrap;
use crate::waves::WaveSet;

/// Converts elapsed seconds (f64) into the f32 time fed to the evaluators
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveClock {
    wrap: TimeWrap,
}

impl WaveClock {
    pub fn new(wrap: TimeWrap) -> Self {
        Self { wrap }
    }

    /// Clock matching the loop period a set was snapped to
    pub fn for_set(waves: &WaveSet) -> Self {
        Self::new(waves.time_wrap())
    }

    pub fn wrap(&self) -> TimeWrap {
        self.wrap
    }

    /// Evaluation time for `elapsed_s` seconds since start
    pub fn evaluation_time(&self, elapsed_s: f64) -> f32 {
        match self.wrap {
            TimeWrap::Unbounded => elapsed_s as f32,
            TimeWrap::Loop { period_s } => elapsed_s.rem_euclid(period_s as f64) as f32,
        }
    }
}
