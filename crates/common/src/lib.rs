//! Shared value types for the cellspace workspace: colors, axes, query boxes,
//! automaton phases, a deterministic PRNG and the common error type.

mod error;
mod rng;
mod types;

pub use error::CellspaceError;
pub use rng::SplitMix64;
pub use types::{Axis, CellBox, Extent, Phase, Rgb};
