//! High-level ocean system: wave set, clock and grid evaluated per frame.

use std::sync::Arc;

use super::mesh::OceanGrid;
use crate::error::Result;
use crate::field::{WaveClock, WaveField};
use crate::params::{DisplacementMode, FieldParams, GridParams, WaveSetConfig};
use crate::waves::{generate_wave_set, BaseWaveGenerator, SharedWaveSet, WaveSet};

/// High-level ocean system owning the grid and the current wave set
pub struct OceanSystem {
    pub grid: OceanGrid,
    waves: Arc<SharedWaveSet>,
    params: FieldParams,
    clock: WaveClock,
}

impl OceanSystem {
    /// Create new ocean system with specified parameters
    ///
    /// A loop period in `field` snaps the set's phase speeds before use.
    pub fn new(waves: WaveSet, grid: &GridParams, field: FieldParams) -> Result<Self> {
        grid.validate()?;
        let waves = waves.with_time_wrap(field.time_wrap)?;
        let clock = WaveClock::for_set(&waves);

        Ok(Self {
            grid: OceanGrid::new(grid),
            waves: Arc::new(SharedWaveSet::new(waves)),
            params: field,
            clock,
        })
    }

    /// Handle for other consumers (physics, GPU upload) to snapshot the set
    pub fn wave_handle(&self) -> Arc<SharedWaveSet> {
        Arc::clone(&self.waves)
    }

    /// Snapshot of the current wave set
    pub fn waves(&self) -> Arc<WaveSet> {
        self.waves.load()
    }

    pub fn mode(&self) -> DisplacementMode {
        self.params.mode
    }

    /// Evaluation time for `elapsed_s` under the configured time policy
    pub fn evaluation_time(&self, elapsed_s: f64) -> f32 {
        self.clock.evaluation_time(elapsed_s)
    }

    /// Update the grid for the frame at `elapsed_s` seconds
    ///
    /// # Returns
    /// * Evaluation time actually used (after wrapping)
    pub fn update(&mut self, elapsed_s: f64) -> f32 {
        let time_s = self.evaluation_time(elapsed_s);
        let waves = self.waves.load();
        let field = WaveField::new(&waves, self.params.mode);
        self.grid.update(&field, time_s);
        time_s
    }

    /// Generate and publish a new wave set
    ///
    /// Snapshots already handed out keep the previous set. On error the
    /// current set stays in place.
    ///
    /// # Returns
    /// * The set that was replaced
    pub fn regenerate<G>(&mut self, config: &WaveSetConfig, base: &mut G) -> Result<Arc<WaveSet>>
    where
        G: BaseWaveGenerator + ?Sized,
    {
        let waves = generate_wave_set(config, base)?.with_time_wrap(self.params.time_wrap)?;
        log::debug!("Publishing regenerated wave set ({} waves)", waves.len());
        Ok(self.waves.publish(waves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BaseWaveParams, TimeWrap};
    use crate::waves::{generate_seeded, RandomBaseGenerator};

    fn small_grid() -> GridParams {
        GridParams {
            grid_size: 16,
            grid_spacing_m: 1.0,
        }
    }

    fn waves(seed: u64) -> WaveSet {
        generate_seeded(&WaveSetConfig::default(), BaseWaveParams::default(), seed).unwrap()
    }

    #[test]
    fn test_update_displaces_grid() {
        let mut ocean = OceanSystem::new(waves(1), &small_grid(), FieldParams::default()).unwrap();
        let time = ocean.update(1.25);
        assert_eq!(time, 1.25);

        let (lo, hi) = ocean.grid.height_range();
        assert!(hi > lo, "grid should no longer be flat");
        let bound = ocean.waves().total_amplitude();
        assert!(lo >= -bound - 1e-4 && hi <= bound + 1e-4);
    }

    #[test]
    fn test_loop_period_applied_to_set_and_clock() {
        let field = FieldParams {
            time_wrap: TimeWrap::Loop { period_s: 20.0 },
            ..Default::default()
        };
        let mut ocean = OceanSystem::new(waves(2), &small_grid(), field).unwrap();

        assert_eq!(ocean.waves().loop_period(), Some(20.0));
        let time = ocean.update(45.0);
        assert!((time - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let grid = GridParams {
            grid_size: 0,
            ..Default::default()
        };
        assert!(OceanSystem::new(waves(1), &grid, FieldParams::default()).is_err());
    }

    #[test]
    fn test_regenerate_publishes_new_set() {
        let mut ocean = OceanSystem::new(waves(1), &small_grid(), FieldParams::default()).unwrap();
        let handle = ocean.wave_handle();
        let in_flight = handle.load();

        let config = WaveSetConfig {
            wave_count: 4,
            ..Default::default()
        };
        let mut base = RandomBaseGenerator::new(99, BaseWaveParams::default()).unwrap();
        let previous = ocean.regenerate(&config, &mut base).unwrap();

        assert_eq!(previous.len(), 16);
        assert_eq!(in_flight.len(), 16);
        assert_eq!(handle.load().len(), 4);
        assert_eq!(ocean.waves().len(), 4);
    }

    #[test]
    fn test_failed_regenerate_keeps_current_set() {
        let mut ocean = OceanSystem::new(waves(1), &small_grid(), FieldParams::default()).unwrap();
        let config = WaveSetConfig {
            wave_count: 0,
            ..Default::default()
        };
        let mut base = RandomBaseGenerator::new(1, BaseWaveParams::default()).unwrap();
        assert!(ocean.regenerate(&config, &mut base).is_err());
        assert_eq!(ocean.waves().len(), 16);
    }
}
