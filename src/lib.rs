//! Swell library - procedural Gerstner wave field for ocean surfaces

pub mod cli;
pub mod error;
pub mod export;
pub mod field;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod ocean;
pub mod params;
pub mod waves;

pub use error::{Result, WaveError};
