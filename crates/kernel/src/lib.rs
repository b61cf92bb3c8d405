//! World Kernel: the authoritative voxel world, the rule protocol and the
//! phased automaton engine.
//!
//! # Invariants
//! - At most one cell per coordinate.
//! - The coordinate map and the three axis indices hold exactly the live cells;
//!   every mutation flows through `spawn`, `delete` or `clear`.
//! - A cell spawned during a cycle is first run in the following cycle.

pub mod engine;
pub mod rule;
pub mod world;

pub use engine::{AutomatonEngine, CycleReport};
pub use rule::{CellContext, Rule, RuleKind};
pub use world::{Cell, CellId, DEFAULT_EVENT_CAPACITY, VoxelWorld, WorldEvent};
