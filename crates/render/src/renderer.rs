use cellspace_common::{CellspaceError, Rgb};
use cellspace_kernel::VoxelWorld;
use std::fmt::Write;

use crate::camera::Camera;
use crate::projection::{Face, Projector};
use crate::raster::Frame;

/// Renderer-agnostic interface.
///
/// A renderer reads the world and the camera and produces output. It never
/// mutates the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &VoxelWorld, camera: &Camera) -> Self::Output;
}

/// Software perspective renderer drawing every visible cell as a cube.
///
/// Faces are painted far to near, each filled with the cell color and
/// outlined in a darker shade.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    background: Rgb,
    outline: bool,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, CellspaceError> {
        if width == 0 || height == 0 {
            return Err(CellspaceError::InvalidFrameSize { width, height });
        }
        Ok(Self {
            width,
            height,
            background: Rgb::WHITE,
            outline: true,
        })
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn with_outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Visible faces of every cell the camera sees, farthest first.
    pub fn painter_order(&self, world: &VoxelWorld, camera: &Camera) -> Vec<Face> {
        let projector = Projector::new(camera, self.width, self.height);
        let mut faces: Vec<Face> = world
            .cells()
            .filter(|cell| camera.sees(cell.coord()))
            .flat_map(|cell| projector.cube_faces(cell.coord(), cell.color()))
            .collect();
        faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        faces
    }
}

impl Renderer for SoftwareRenderer {
    type Output = Frame;

    fn render(&self, world: &VoxelWorld, camera: &Camera) -> Frame {
        let _span = tracing::info_span!("render_frame", cells = world.len()).entered();
        let mut frame = Frame::filled(self.width, self.height, self.background);
        let faces = self.painter_order(world, camera);
        for face in &faces {
            frame.fill_polygon(&face.points, face.color);
            if self.outline {
                frame.stroke_polygon(&face.points, face.color.scaled(0.5));
            }
        }
        tracing::trace!(faces = faces.len(), "frame rasterized");
        frame
    }
}

/// Plain-text listing of the cells the camera sees.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &VoxelWorld, camera: &Camera) -> String {
        let mut visible: Vec<_> = world.cells().filter(|c| camera.sees(c.coord())).collect();
        visible.sort_by_key(|c| c.coord().to_array());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Cells (live={}, visible={}) ===",
            world.len(),
            visible.len()
        );
        let p = camera.position;
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) pitch={:.2} yaw={:.2} fov={:.0} distance={}",
            p.x, p.y, p.z, camera.pitch, camera.yaw, camera.fov_degrees, camera.render_distance
        );
        for cell in visible {
            let c = cell.coord();
            let tags: Vec<&str> = cell.tags().iter().map(String::as_str).collect();
            let _ = writeln!(
                out,
                "  ({}, {}, {}) {} [{}]",
                c.x,
                c.y,
                c.z,
                cell.kind(),
                tags.join(",")
            );
        }
        out
    }
}
