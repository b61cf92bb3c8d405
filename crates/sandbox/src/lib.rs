//! The sandbox environment: owns the world and engine, applies user actions,
//! advances the camera and the automaton each frame, and renders.
//!
//! # Invariants
//! - The world horizon always matches the camera's render distance before a
//!   cycle runs.
//! - Reset clears cells but never rewinds the cycle counter.

mod config;
mod sandbox;
mod scenario;

pub use config::{CameraConfig, ConfigError, SandboxConfig};
pub use sandbox::Sandbox;
pub use scenario::Scenario;
