//! Rendering Adapter: a hand-rolled perspective renderer over the voxel world,
//! the camera that drives it, and ray picking for mouse interaction.
//!
//! # Invariants
//! - Renderer and picker never mutate world truth.
//! - The camera rotation is derived from pitch and yaw once per frame.
//! - Only cells within render distance of the camera voxel on every axis are
//!   drawn.

mod camera;
mod picker;
mod projection;
mod raster;
mod renderer;

pub use camera::{Camera, rotation_matrix};
pub use picker::{MAX_TRAVERSAL, Picker, RayVoxel, traverse};
pub use projection::{Face, Projector, focal_length};
pub use raster::Frame;
pub use renderer::{DebugTextRenderer, Renderer, SoftwareRenderer};
