//! Rule packs: Life on one or more planes through a cell, anchors that switch
//! planes on across a whole axis line, and a virus that floods the grid.
//!
//! # Invariants
//! - Rules change type only by replacing their own cell.
//! - Every rule tolerates lost spawns into occupied coordinates.

mod catalog;
mod life;
mod planes;
mod virus;

pub use catalog::RuleCatalog;
pub use life::{ALIVE, ALIVE_ANCHOR, ALIVE_COLOR, DEAD, DEAD_ANCHOR, DEAD_COLOR, LifeCell, Vitality};
pub use planes::{ANCHOR_TAG, Plane, PlaneActivation, PlaneSet};
pub use virus::{VIRUS, VIRUS_COLOR, Virus};
