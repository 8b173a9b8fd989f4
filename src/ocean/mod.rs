//! Ocean surface grid driven by the wave field.

mod mesh;
mod system;

// Re-export public types
pub use mesh::{OceanGrid, Vertex};
pub use system::OceanSystem;
