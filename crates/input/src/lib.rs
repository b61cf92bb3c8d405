//! Input: everything the user can do, expressed as [`Action`] values, plus
//! the held-key state and frame clock that turn key presses into smooth
//! camera motion.
//!
//! # Invariants
//! - The sandbox consumes actions, never raw window events.
//! - Camera motion per frame is bounded by the clock's maximum step.

mod action;
mod clock;
mod keys;

pub use action::Action;
pub use clock::FrameClock;
pub use keys::{HeldKeys, MoveKey};
