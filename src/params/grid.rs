//! Sample grid parameters.

use crate::error::{Result, WaveError};

/// Flat sample grid evaluated each frame
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    /// Grid resolution (cells per side, e.g., 256 = 66,049 vertices)
    pub grid_size: usize,

    /// Spacing between grid vertices in world units (meters)
    pub grid_spacing_m: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            grid_size: 256,
            grid_spacing_m: 0.5, // 128m patch
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(WaveError::invalid("grid size must be at least 1"));
        }
        // Indices are u32
        if (self.grid_size + 1).checked_pow(2).map_or(true, |n| n > u32::MAX as usize) {
            return Err(WaveError::invalid(format!(
                "grid size {} exceeds u32 vertex indexing",
                self.grid_size
            )));
        }
        if !(self.grid_spacing_m.is_finite() && self.grid_spacing_m > 0.0) {
            return Err(WaveError::invalid(format!(
                "grid spacing must be > 0, got {}",
                self.grid_spacing_m
            )));
        }
        Ok(())
    }

    /// Side length of the grid in meters
    pub fn extent_m(&self) -> f32 {
        self.grid_size as f32 * self.grid_spacing_m
    }
}
