//! Per-sample wave field evaluation: displacement and normal perturbation.
//!
//! Everything here is a pure function of `(position, wave set, time)`, so
//! batches can be split across threads freely.
//!
//! ## Normal convention
//!
//! [`normal`] returns a *perturbation*, not a unit normal. Add the flat
//! surface normal `(0, 1, 0)` and renormalize before lighting, or call
//! [`combine_with_base_normal`] which does exactly that.

mod clock;

use glam::Vec3;
use rayon::prelude::*;

pub use clock::WaveClock;

use crate::params::DisplacementMode;
use crate::waves::{WaveDescriptor, WaveSet};

/// Phase angle of one wave at a horizontal position (y is ignored)
#[inline]
fn wave_angle(wave: &WaveDescriptor, position: Vec3, time: f32) -> f32 {
    let pos = position.x * wave.direction.x + position.z * wave.direction.y;
    wave.frequency * pos + wave.phase * time
}

/// Gerstner displacement at `position` and `time`
pub fn displace(position: Vec3, waves: &WaveSet, time: f32) -> Vec3 {
    displace_with(DisplacementMode::Gerstner, position, waves, time)
}

/// Displacement under the given mode.
///
/// Sum-of-sines mode only moves points vertically.
pub fn displace_with(mode: DisplacementMode, position: Vec3, waves: &WaveSet, time: f32) -> Vec3 {
    let mut displacement = Vec3::ZERO;

    for wave in waves {
        let theta = wave_angle(wave, position, time);
        let (s, c) = theta.sin_cos();

        displacement.y += wave.amplitude * s;
        if mode == DisplacementMode::Gerstner {
            displacement.x += wave.amplitude * wave.direction.x * c;
            displacement.z += wave.amplitude * wave.direction.y * c;
        }
    }

    displacement
}

/// Gerstner normal perturbation at `position` and `time`
pub fn normal(position: Vec3, waves: &WaveSet, time: f32) -> Vec3 {
    normal_with(DisplacementMode::Gerstner, position, waves, time)
}

/// Normal perturbation under the given mode.
///
/// Directions are already unit length inside a `WaveSet`. In sum-of-sines
/// mode only the horizontal slope terms are produced.
pub fn normal_with(mode: DisplacementMode, position: Vec3, waves: &WaveSet, time: f32) -> Vec3 {
    let mut n = Vec3::ZERO;

    for wave in waves {
        let theta = wave_angle(wave, position, time);
        let (s, c) = theta.sin_cos();
        let wa = wave.frequency * wave.amplitude;

        n.x -= wave.direction.x * wa * c;
        n.z -= wave.direction.y * wa * c;
        if mode == DisplacementMode::Gerstner {
            n.y += wa * s;
        }
    }

    n
}

/// Add the flat surface normal to a perturbation and renormalize
pub fn combine_with_base_normal(perturbation: Vec3) -> Vec3 {
    (Vec3::Y + perturbation).try_normalize().unwrap_or(Vec3::Y)
}

/// Result of evaluating one sample point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSample {
    /// Offset to add to the rest position
    pub displacement: Vec3,

    /// Raw normal perturbation (see module docs)
    pub normal_perturbation: Vec3,
}

impl SurfaceSample {
    /// Displaced world position for a rest position on the flat surface
    pub fn position(&self, rest: Vec3) -> Vec3 {
        rest + self.displacement
    }

    /// Unit normal ready for lighting
    pub fn unit_normal(&self) -> Vec3 {
        combine_with_base_normal(self.normal_perturbation)
    }
}

/// A wave set bound to a displacement mode
#[derive(Debug, Clone, Copy)]
pub struct WaveField<'a> {
    waves: &'a WaveSet,
    mode: DisplacementMode,
}

impl<'a> WaveField<'a> {
    pub fn new(waves: &'a WaveSet, mode: DisplacementMode) -> Self {
        Self { waves, mode }
    }

    /// Gerstner field (the default mode)
    pub fn gerstner(waves: &'a WaveSet) -> Self {
        Self::new(waves, DisplacementMode::Gerstner)
    }

    pub fn waves(&self) -> &'a WaveSet {
        self.waves
    }

    pub fn mode(&self) -> DisplacementMode {
        self.mode
    }

    pub fn displace(&self, position: Vec3, time: f32) -> Vec3 {
        displace_with(self.mode, position, self.waves, time)
    }

    pub fn normal(&self, position: Vec3, time: f32) -> Vec3 {
        normal_with(self.mode, position, self.waves, time)
    }

    /// Vertical displacement only
    pub fn height(&self, position: Vec3, time: f32) -> f32 {
        self.displace(position, time).y
    }

    /// Displacement and normal in a single pass over the waves
    pub fn sample(&self, position: Vec3, time: f32) -> SurfaceSample {
        let gerstner = self.mode == DisplacementMode::Gerstner;
        let mut displacement = Vec3::ZERO;
        let mut n = Vec3::ZERO;

        for wave in self.waves {
            let theta = wave_angle(wave, position, time);
            let (s, c) = theta.sin_cos();
            let wa = wave.frequency * wave.amplitude;

            displacement.y += wave.amplitude * s;
            n.x -= wave.direction.x * wa * c;
            n.z -= wave.direction.y * wa * c;
            if gerstner {
                displacement.x += wave.amplitude * wave.direction.x * c;
                displacement.z += wave.amplitude * wave.direction.y * c;
                n.y += wa * s;
            }
        }

        SurfaceSample {
            displacement,
            normal_perturbation: n,
        }
    }

    /// Evaluate a batch of positions in parallel (order preserved)
    pub fn sample_many(&self, positions: &[Vec3], time: f32) -> Vec<SurfaceSample> {
        positions
            .par_iter()
            .map(|&position| self.sample(position, time))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BaseWaveParams, WaveSetConfig};
    use crate::waves::generate_seeded;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f32) {
        assert!(a.abs_diff_eq(b, eps), "{:?} != {:?}", a, b);
    }

    fn single_wave() -> WaveSet {
        WaveSet::from_descriptors([WaveDescriptor::new(Vec2::new(1.0, 0.0), 2.0, 1.0, 0.0)])
            .unwrap()
    }

    fn ocean() -> WaveSet {
        generate_seeded(&WaveSetConfig::default(), BaseWaveParams::default(), 42).unwrap()
    }

    #[test]
    fn test_single_wave_at_origin() {
        let d = displace(Vec3::ZERO, &single_wave(), 0.0);
        assert_vec_close(d, Vec3::new(2.0, 0.0, 0.0), EPS);
    }

    #[test]
    fn test_single_wave_at_crest() {
        let d = displace(Vec3::new(FRAC_PI_2, 0.0, 0.0), &single_wave(), 0.0);
        assert!((d.y - 2.0).abs() < EPS);
        assert!(d.x.abs() < EPS);
    }

    #[test]
    fn test_input_height_is_ignored() {
        let waves = ocean();
        let a = displace(Vec3::new(3.0, 0.0, -2.0), &waves, 1.5);
        let b = displace(Vec3::new(3.0, 50.0, -2.0), &waves, 1.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_phase_advances_with_time() {
        let waves = WaveSet::from_descriptors([WaveDescriptor::new(Vec2::X, 1.0, 1.0, 2.0)])
            .unwrap();
        // theta = 0 + 2 * (π/4) = π/2
        let d = displace(Vec3::ZERO, &waves, FRAC_PI_2 / 2.0);
        assert!((d.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_sum_of_sines_is_vertical_only() {
        let waves = ocean();
        let p = Vec3::new(4.0, 0.0, 7.5);
        let sines = displace_with(DisplacementMode::SumOfSines, p, &waves, 2.0);
        let gerstner = displace_with(DisplacementMode::Gerstner, p, &waves, 2.0);

        assert_eq!(sines.x, 0.0);
        assert_eq!(sines.z, 0.0);
        assert!((sines.y - gerstner.y).abs() < EPS);

        let expected: f32 = waves
            .iter()
            .map(|w| {
                let pos = p.x * w.direction.x + p.z * w.direction.y;
                w.amplitude * (w.frequency * pos + w.phase * 2.0).sin()
            })
            .sum();
        assert!((sines.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_displacement_bounded_by_amplitude_sum() {
        let waves = ocean();
        let bound = waves.total_amplitude() + EPS;
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 1.3, 0.0, i as f32 * -0.7);
            let d = displace(p, &waves, i as f32 * 0.1);
            assert!(d.abs().max_element() <= bound, "{:?} exceeds {}", d, bound);
        }
    }

    #[test]
    fn test_flat_set_has_zero_normal() {
        let flat = WaveSet::from_descriptors([
            WaveDescriptor::new(Vec2::X, 0.0, 1.0, 1.0),
            WaveDescriptor::new(Vec2::new(-0.6, 0.8), 0.0, 2.5, 0.3),
        ])
        .unwrap();

        for mode in [DisplacementMode::Gerstner, DisplacementMode::SumOfSines] {
            let n = normal_with(mode, Vec3::new(1.7, 0.0, -3.2), &flat, 12.0);
            assert_eq!(n, Vec3::ZERO);
        }
        assert_eq!(
            combine_with_base_normal(normal(Vec3::ZERO, &flat, 0.0)),
            Vec3::Y
        );
    }

    #[test]
    fn test_single_wave_normal() {
        // theta = 0: c = 1, s = 0, wa = 2
        let n = normal(Vec3::ZERO, &single_wave(), 0.0);
        assert_vec_close(n, Vec3::new(-2.0, 0.0, 0.0), EPS);

        // theta = π/2: c = 0, s = 1
        let n = normal(Vec3::new(FRAC_PI_2, 0.0, 0.0), &single_wave(), 0.0);
        assert_vec_close(n, Vec3::new(0.0, 2.0, 0.0), EPS);
    }

    #[test]
    fn test_sum_of_sines_normal_matches_height_gradient() {
        let waves = ocean();
        let field = WaveField::new(&waves, DisplacementMode::SumOfSines);
        let p = Vec3::new(2.0, 0.0, 1.0);
        let h = 1e-2;

        let dh_dx = (field.height(p + Vec3::X * h, 0.5) - field.height(p - Vec3::X * h, 0.5))
            / (2.0 * h);
        let dh_dz = (field.height(p + Vec3::Z * h, 0.5) - field.height(p - Vec3::Z * h, 0.5))
            / (2.0 * h);

        let n = field.normal(p, 0.5);
        assert_eq!(n.y, 0.0);
        assert!((n.x + dh_dx).abs() < 5e-2, "{} vs {}", n.x, -dh_dx);
        assert!((n.z + dh_dz).abs() < 5e-2, "{} vs {}", n.z, -dh_dz);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let waves = ocean();
        let p = Vec3::new(-11.0, 0.0, 5.25);
        assert_eq!(displace(p, &waves, 3.3), displace(p, &waves, 3.3));
        assert_eq!(normal(p, &waves, 3.3), normal(p, &waves, 3.3));
    }

    #[test]
    fn test_sample_matches_separate_calls() {
        let waves = ocean();
        for mode in [DisplacementMode::Gerstner, DisplacementMode::SumOfSines] {
            let field = WaveField::new(&waves, mode);
            let p = Vec3::new(6.0, 0.0, -1.5);
            let sample = field.sample(p, 0.75);
            assert_vec_close(sample.displacement, field.displace(p, 0.75), EPS);
            assert_vec_close(sample.normal_perturbation, field.normal(p, 0.75), EPS);
        }
    }

    #[test]
    fn test_sample_many_preserves_order() {
        let waves = ocean();
        let field = WaveField::gerstner(&waves);
        let positions: Vec<Vec3> = (0..257)
            .map(|i| Vec3::new(i as f32 * 0.25, 0.0, (i % 13) as f32))
            .collect();

        let batch = field.sample_many(&positions, 4.0);
        assert_eq!(batch.len(), positions.len());
        for (sample, &p) in batch.iter().zip(&positions) {
            assert_eq!(*sample, field.sample(p, 4.0));
        }
    }

    #[test]
    fn test_unit_normal_is_normalized() {
        let waves = ocean();
        let field = WaveField::gerstner(&waves);
        let sample = field.sample(Vec3::new(1.0, 0.0, 2.0), 0.0);
        let n = sample.unit_normal();
        assert!((n.length() - 1.0).abs() < 1e-4);
        assert_eq!(
            sample.position(Vec3::new(1.0, 0.0, 2.0)),
            Vec3::new(1.0, 0.0, 2.0) + sample.displacement
        );
    }
}
