//! Wave set generation parameters.

use std::ops::Range;

use crate::error::{Result, WaveError};

/// Falloff configuration for a generated wave set
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSetConfig {
    /// Number of waves in the set (must be at least 1)
    pub wave_count: usize,

    /// Frequency multiplier applied per successive wave (dimensionless, > 0)
    /// Values above 1 push later waves toward finer detail
    pub frequency_multiplier: f32,

    /// Amplitude multiplier applied per successive wave (dimensionless, > 0)
    /// Values below 1 keep the amplitude sum bounded as the count grows
    pub amplitude_multiplier: f32,
}

impl Default for WaveSetConfig {
    fn default() -> Self {
        Self {
            wave_count: 16,
            frequency_multiplier: 1.18,
            amplitude_multiplier: 0.82,
        }
    }
}

impl WaveSetConfig {
    /// Validate configuration (count > 0, multipliers finite and > 0)
    pub fn validate(&self) -> Result<()> {
        if self.wave_count == 0 {
            return Err(WaveError::invalid("wave count must be at least 1"));
        }
        if !(self.frequency_multiplier.is_finite() && self.frequency_multiplier > 0.0) {
            return Err(WaveError::invalid(format!(
                "frequency multiplier must be > 0, got {}",
                self.frequency_multiplier
            )));
        }
        if !(self.amplitude_multiplier.is_finite() && self.amplitude_multiplier > 0.0) {
            return Err(WaveError::invalid(format!(
                "amplitude multiplier must be > 0, got {}",
                self.amplitude_multiplier
            )));
        }
        Ok(())
    }

    /// Upper bound on the summed amplitude for a constant base amplitude.
    ///
    /// Closed form of the geometric series `base * Σ m^i` over the configured count.
    pub fn amplitude_bound(&self, base_amplitude_m: f32) -> f32 {
        let m = self.amplitude_multiplier;
        if (m - 1.0).abs() < f32::EPSILON {
            return base_amplitude_m * self.wave_count as f32;
        }
        base_amplitude_m * (1.0 - m.powi(self.wave_count as i32)) / (1.0 - m)
    }
}

/// Ranges for the randomized base wave fed into the falloff loop
#[derive(Debug, Clone, PartialEq)]
pub struct BaseWaveParams {
    /// Amplitude of the first wave in meters
    pub amplitude_m: f32,

    /// Spatial frequency of the first wave (radians per meter)
    /// 1.0 ≈ 6.3m wavelength
    pub frequency: f32,

    /// Phase speed coefficient range (radians per second), sampled per wave
    pub phase_speed: Range<f32>,

    /// Prevailing wind direction (degrees, 0 = +X, 90 = +Z)
    pub wind_direction_deg: f32,

    /// Half-width of the direction spread around the wind (degrees)
    /// 180 = fully isotropic, 0 = every wave travels with the wind
    pub direction_spread_deg: f32,
}

impl Default for BaseWaveParams {
    fn default() -> Self {
        Self {
            amplitude_m: 1.0,
            frequency: 1.0,
            phase_speed: 0.5..2.0,
            wind_direction_deg: 0.0,
            direction_spread_deg: 180.0,
        }
    }
}

impl BaseWaveParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.amplitude_m.is_finite() && self.amplitude_m >= 0.0) {
            return Err(WaveError::invalid(format!(
                "base amplitude must be >= 0, got {}",
                self.amplitude_m
            )));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(WaveError::invalid(format!(
                "base frequency must be > 0, got {}",
                self.frequency
            )));
        }
        let Range { start, end } = self.phase_speed;
        if !(start.is_finite() && end.is_finite() && start <= end) {
            return Err(WaveError::invalid(format!(
                "phase speed range {}..{} is empty or not finite",
                start, end
            )));
        }
        if !self.wind_direction_deg.is_finite() {
            return Err(WaveError::invalid("wind direction must be finite"));
        }
        if !(self.direction_spread_deg.is_finite() && self.direction_spread_deg >= 0.0) {
            return Err(WaveError::invalid(format!(
                "direction spread must be >= 0, got {}",
                self.direction_spread_deg
            )));
        }
        Ok(())
    }
}
