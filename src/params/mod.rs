//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Physical units (meters, seconds, radians)
//! - Documented ranges and meanings
//! - A `validate()` check run before anything is built from them

mod field;
mod grid;
mod waves;

// Re-export all types
pub use field::{DisplacementMode, FieldParams, TimeWrap};
pub use grid::GridParams;
pub use waves::{BaseWaveParams, WaveSetConfig};
