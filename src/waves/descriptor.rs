//! Single wave descriptor and its packed transfer layout.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::error::{Result, WaveError};

/// One directional wave component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDescriptor {
    /// Travel direction in the XZ plane (unit length once inside a wave set)
    pub direction: Vec2,

    /// Vertical displacement magnitude in meters
    pub amplitude: f32,

    /// Spatial frequency (radians per meter)
    pub frequency: f32,

    /// Phase speed coefficient (radians per second); temporal term is `phase * time`
    pub phase: f32,
}

impl WaveDescriptor {
    pub const fn new(direction: Vec2, amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            direction,
            amplitude,
            frequency,
            phase,
        }
    }

    /// Build a wave travelling at `angle_rad` from +X toward +Z
    pub fn from_angle(angle_rad: f32, amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self::new(Vec2::from_angle(angle_rad), amplitude, frequency, phase)
    }

    /// Wavelength in meters
    pub fn wavelength(&self) -> f32 {
        TAU / self.frequency
    }

    /// Check ranges and normalize the direction.
    ///
    /// `index` is only used in error messages.
    pub(crate) fn validated(self, index: usize) -> Result<Self> {
        let direction = self.direction.try_normalize().ok_or_else(|| {
            WaveError::invalid(format!(
                "wave {} has a zero-length or non-finite direction {:?}",
                index, self.direction
            ))
        })?;
        if !(self.amplitude.is_finite() && self.amplitude >= 0.0) {
            return Err(WaveError::invalid(format!(
                "wave {} amplitude must be >= 0, got {}",
                index, self.amplitude
            )));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(WaveError::invalid(format!(
                "wave {} frequency must be > 0, got {}",
                index, self.frequency
            )));
        }
        if !self.phase.is_finite() {
            return Err(WaveError::invalid(format!(
                "wave {} phase must be finite",
                index
            )));
        }
        Ok(Self { direction, ..self })
    }
}

/// Tightly packed wave for parallel backends: 5 floats, 20 bytes, no padding
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PackedWave {
    pub direction: [f32; 2],
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl From<&WaveDescriptor> for PackedWave {
    fn from(wave: &WaveDescriptor) -> Self {
        Self {
            direction: wave.direction.to_array(),
            amplitude: wave.amplitude,
            frequency: wave.frequency,
            phase: wave.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_layout_is_tight() {
        assert_eq!(std::mem::size_of::<PackedWave>(), 20);
        assert_eq!(std::mem::align_of::<PackedWave>(), 4);
    }

    #[test]
    fn test_validation_normalizes_direction() {
        let wave = WaveDescriptor::new(Vec2::new(3.0, 4.0), 1.0, 1.0, 0.0)
            .validated(0)
            .unwrap();
        assert!((wave.direction.x - 0.6).abs() < 1e-6);
        assert!((wave.direction.y - 0.8).abs() < 1e-6);
        assert!((wave.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation_rejects_degenerate_waves() {
        let zero_dir = WaveDescriptor::new(Vec2::ZERO, 1.0, 1.0, 0.0);
        assert!(zero_dir.validated(0).is_err());

        let negative_amp = WaveDescriptor::new(Vec2::X, -1.0, 1.0, 0.0);
        assert!(negative_amp.validated(0).is_err());

        let zero_freq = WaveDescriptor::new(Vec2::X, 1.0, 0.0, 0.0);
        assert!(zero_freq.validated(0).is_err());

        let nan_phase = WaveDescriptor::new(Vec2::X, 1.0, 1.0, f32::NAN);
        assert!(nan_phase.validated(0).is_err());
    }

    #[test]
    fn test_from_angle_and_wavelength() {
        let wave = WaveDescriptor::from_angle(std::f32::consts::FRAC_PI_2, 1.0, 0.5, 0.0);
        assert!(wave.direction.x.abs() < 1e-6);
        assert!((wave.direction.y - 1.0).abs() < 1e-6);
        assert!((wave.wavelength() - 4.0 * std::f32::consts::PI).abs() < 1e-5);
    }
}
