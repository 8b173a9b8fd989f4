//! Procedural wave set generation with amplitude/frequency falloff.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::descriptor::WaveDescriptor;
use super::set::WaveSet;
use crate::error::Result;
use crate::params::{BaseWaveParams, WaveSetConfig};

/// Source of the per-wave base descriptor before falloff is applied.
///
/// Any `FnMut() -> WaveDescriptor` closure is a generator.
pub trait BaseWaveGenerator {
    fn next_wave(&mut self) -> WaveDescriptor;
}

impl<F> BaseWaveGenerator for F
where
    F: FnMut() -> WaveDescriptor,
{
    fn next_wave(&mut self) -> WaveDescriptor {
        self()
    }
}

/// Seeded random base waves: constant base amplitude and frequency,
/// randomized direction and phase speed.
pub struct RandomBaseGenerator {
    rng: StdRng,
    params: BaseWaveParams,
}

impl RandomBaseGenerator {
    pub fn new(seed: u64, params: BaseWaveParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            params,
        })
    }
}

impl BaseWaveGenerator for RandomBaseGenerator {
    fn next_wave(&mut self) -> WaveDescriptor {
        let wind = self.params.wind_direction_deg.to_radians();
        let spread = self.params.direction_spread_deg.to_radians();
        let angle = if spread > 0.0 {
            wind + self.rng.gen_range(-spread..=spread)
        } else {
            wind
        };

        let speed = &self.params.phase_speed;
        let phase = if speed.start < speed.end {
            self.rng.gen_range(speed.clone())
        } else {
            speed.start
        };

        WaveDescriptor::from_angle(angle, self.params.amplitude_m, self.params.frequency, phase)
    }
}

/// Generate a wave set, scaling each successive base wave by the running
/// frequency and amplitude multipliers.
///
/// # Arguments
/// * `config` - Wave count and falloff multipliers
/// * `base` - Supplies the unscaled descriptor for each index
///
/// # Returns
/// * A set of exactly `config.wave_count` waves, or `InvalidConfiguration`
pub fn generate_wave_set<G>(config: &WaveSetConfig, base: &mut G) -> Result<WaveSet>
where
    G: BaseWaveGenerator + ?Sized,
{
    config.validate()?;

    let mut freq_acc = 1.0_f32;
    let mut amp_acc = 1.0_f32;
    let mut waves = Vec::with_capacity(config.wave_count);

    for _ in 0..config.wave_count {
        let mut wave = base.next_wave();
        wave.frequency *= freq_acc;
        wave.amplitude *= amp_acc;
        waves.push(wave);

        freq_acc *= config.frequency_multiplier;
        amp_acc *= config.amplitude_multiplier;
    }

    let set = WaveSet::from_descriptors(waves)?;
    log::debug!(
        "Generated {} waves (total amplitude {:.3}m, frequencies {:.3}..{:.3} rad/m)",
        set.len(),
        set.total_amplitude(),
        set.as_slice()[0].frequency,
        set.as_slice()[set.len() - 1].frequency
    );
    Ok(set)
}

/// Generate a set from a seed using `RandomBaseGenerator`
pub fn generate_seeded(config: &WaveSetConfig, params: BaseWaveParams, seed: u64) -> Result<WaveSet> {
    let mut base = RandomBaseGenerator::new(seed, params)?;
    generate_wave_set(config, &mut base)
}
