//! Immutable wave sets and the publish/swap handle used to replace them.

use std::f32::consts::TAU;
use std::sync::{Arc, PoisonError, RwLock};

use super::descriptor::{PackedWave, WaveDescriptor};
use crate::error::{Result, WaveError};
use crate::params::TimeWrap;

/// Ordered, non-empty, immutable collection of waves.
///
/// Cloning shares the underlying storage. Directions are unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSet {
    waves: Arc<[WaveDescriptor]>,
    loop_period_s: Option<f32>,
}

impl WaveSet {
    /// Build a set from explicit descriptors, validating and normalizing each
    pub fn from_descriptors(waves: impl IntoIterator<Item = WaveDescriptor>) -> Result<Self> {
        let waves = waves
            .into_iter()
            .enumerate()
            .map(|(i, wave)| wave.validated(i))
            .collect::<Result<Vec<_>>>()?;

        if waves.is_empty() {
            return Err(WaveError::invalid("a wave set needs at least one wave"));
        }

        Ok(Self {
            waves: waves.into(),
            loop_period_s: None,
        })
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn as_slice(&self) -> &[WaveDescriptor] {
        &self.waves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WaveDescriptor> {
        self.waves.iter()
    }

    /// Sum of all amplitudes; bounds |displacement| in every axis
    pub fn total_amplitude(&self) -> f32 {
        self.waves.iter().map(|w| w.amplitude).sum()
    }

    /// Loop period the phases were snapped to, if any
    pub fn loop_period(&self) -> Option<f32> {
        self.loop_period_s
    }

    /// Time policy matching this set
    pub fn time_wrap(&self) -> TimeWrap {
        match self.loop_period_s {
            Some(period_s) => TimeWrap::Loop { period_s },
            None => TimeWrap::Unbounded,
        }
    }

    /// Packed copy for upload to a parallel backend
    pub fn packed(&self) -> Vec<PackedWave> {
        self.waves.iter().map(PackedWave::from).collect()
    }

    /// Packed copy as raw bytes (native endianness)
    pub fn packed_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.packed()).to_vec()
    }

    /// New set whose phase speeds complete whole cycles every `period_s`.
    ///
    /// Each phase is rounded to the nearest multiple of 2π / period, so
    /// wrapping time modulo the period is seamless for every wave.
    pub fn with_loop_period(&self, period_s: f32) -> Result<Self> {
        TimeWrap::Loop { period_s }.validate()?;

        let step = TAU / period_s;
        let waves: Vec<WaveDescriptor> = self
            .waves
            .iter()
            .map(|wave| WaveDescriptor {
                phase: (wave.phase / step).round() * step,
                ..*wave
            })
            .collect();

        Ok(Self {
            waves: waves.into(),
            loop_period_s: Some(period_s),
        })
    }

    /// Apply a time policy, returning a set that honors it
    pub fn with_time_wrap(&self, wrap: TimeWrap) -> Result<Self> {
        match wrap {
            TimeWrap::Unbounded => Ok(self.clone()),
            TimeWrap::Loop { period_s } => self.with_loop_period(period_s),
        }
    }
}

impl<'a> IntoIterator for &'a WaveSet {
    type Item = &'a WaveDescriptor;
    type IntoIter = std::slice::Iter<'a, WaveDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Shared handle to the current wave set.
///
/// Readers take a snapshot with `load()`; `publish()` swaps in a new set
/// without touching snapshots already handed out.
#[derive(Debug)]
pub struct SharedWaveSet {
    current: RwLock<Arc<WaveSet>>,
}

impl SharedWaveSet {
    pub fn new(waves: WaveSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(waves)),
        }
    }

    /// Snapshot of the current set
    pub fn load(&self) -> Arc<WaveSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the current set, returning the previous one
    pub fn publish(&self, waves: WaveSet) -> Arc<WaveSet> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(waves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn wave(phase: f32) -> WaveDescriptor {
        WaveDescriptor::new(Vec2::X, 1.0, 1.0, phase)
    }

    #[test]
    fn test_empty_set_rejected() {
        let result = WaveSet::from_descriptors(Vec::new());
        assert!(matches!(result, Err(WaveError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_invalid_wave_rejected_with_index() {
        let result = WaveSet::from_descriptors([
            wave(0.0),
            WaveDescriptor::new(Vec2::ZERO, 1.0, 1.0, 0.0),
        ]);
        match result {
            Err(WaveError::InvalidConfiguration(msg)) => assert!(msg.contains("wave 1")),
            other => panic!("expected invalid configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_packed_bytes_layout() {
        let set = WaveSet::from_descriptors([
            WaveDescriptor::new(Vec2::Y, 2.0, 3.0, 4.0),
            wave(0.5),
        ])
        .unwrap();

        let bytes = set.packed_bytes();
        assert_eq!(bytes.len(), 2 * 20);

        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(&floats[..5], &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(&floats[5..], &[1.0, 0.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_loop_period_snaps_phases() {
        let set = WaveSet::from_descriptors([wave(0.7), wave(1.9), wave(-0.4)]).unwrap();
        let period = 30.0;
        let looped = set.with_loop_period(period).unwrap();

        assert_eq!(looped.loop_period(), Some(period));
        assert_eq!(looped.time_wrap(), TimeWrap::Loop { period_s: period });
        // The original is untouched
        assert_eq!(set.loop_period(), None);

        for (before, after) in set.iter().zip(looped.iter()) {
            let cycles = after.phase * period / TAU;
            assert!((cycles - cycles.round()).abs() < 1e-3, "{} cycles", cycles);
            assert!((before.phase - after.phase).abs() <= TAU / period / 2.0 + 1e-6);
        }
    }

    #[test]
    fn test_loop_period_rejects_bad_period() {
        let set = WaveSet::from_descriptors([wave(1.0)]).unwrap();
        assert!(set.with_loop_period(0.0).is_err());
        assert!(set.with_loop_period(-5.0).is_err());
    }

    #[test]
    fn test_publish_keeps_old_snapshots_intact() {
        let first = WaveSet::from_descriptors([wave(1.0)]).unwrap();
        let second = WaveSet::from_descriptors([wave(2.0), wave(3.0)]).unwrap();

        let shared = SharedWaveSet::new(first.clone());
        let snapshot = shared.load();

        let previous = shared.publish(second.clone());

        assert_eq!(*previous, first);
        assert_eq!(*snapshot, first);
        assert_eq!(*shared.load(), second);
    }
}
