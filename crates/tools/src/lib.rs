//! Developer tooling: read-only inspection of the voxel world.
//!
//! # Invariants
//! - Tools never mutate the world.

mod inspector;

pub use inspector::{CellInfo, WorldInspector, WorldSummary};
