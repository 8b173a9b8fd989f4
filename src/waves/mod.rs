//! Wave descriptors, immutable wave sets and their procedural generator.

mod descriptor;
mod generator;
mod set;

// Re-export public types
pub use descriptor::{PackedWave, WaveDescriptor};
pub use generator::{generate_seeded, generate_wave_set, BaseWaveGenerator, RandomBaseGenerator};
pub use set::{SharedWaveSet, WaveSet};
