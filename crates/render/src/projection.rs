use cellspace_common::Rgb;
use glam::{IVec3, Mat3, Vec2, Vec3};

use crate::camera::Camera;

/// Corners of a unit cube centered on its cell. Bit 0 of the index picks +x,
/// bit 1 +y and bit 2 +z.
const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// Corner indices of each face, in winding order: -x, +x, -y, +y, -z, +z.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 2, 6, 4],
    [1, 3, 7, 5],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 1, 3, 2],
    [4, 5, 7, 6],
];

/// Faces kept per cube. A convex cube never shows more.
const FACES_PER_CELL: usize = 3;

/// Focal length in pixels for a horizontal field of view.
///
/// A field of view outside (0, 180) degrees falls back to a 90 degree scale.
pub fn focal_length(width: u32, fov_degrees: f32) -> f32 {
    let half_tan = if fov_degrees > 0.0 && fov_degrees < 180.0 {
        (fov_degrees.to_radians() / 2.0).tan()
    } else {
        1.0
    };
    width as f32 / (2.0 * half_tan)
}

/// One projected cube face, ready to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub cell: IVec3,
    pub points: [Vec2; 4],
    /// Mean camera distance of the face's corners.
    pub depth: f32,
    pub color: Rgb,
}

/// World-to-screen mapping for one frame.
///
/// The camera orientation is captured once at construction; moving the camera
/// afterwards does not affect an existing projector.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    position: Vec3,
    world_to_camera: Mat3,
    focal: f32,
    center: Vec2,
}

impl Projector {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        Self {
            position: camera.position,
            world_to_camera: camera.rotation().transpose(),
            focal: focal_length(width, camera.fov_degrees),
            center: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        }
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn to_camera(&self, world: Vec3) -> Vec3 {
        self.world_to_camera * (world - self.position)
    }

    /// Screen position of a camera-space point; `None` at or behind the
    /// camera plane.
    pub fn project(&self, cam: Vec3) -> Option<Vec2> {
        if cam.z <= 0.0 {
            return None;
        }
        let scale = self.focal / cam.z;
        Some(Vec2::new(
            self.center.x + cam.x * scale,
            self.center.y - cam.y * scale,
        ))
    }

    pub fn project_world(&self, world: Vec3) -> Option<Vec2> {
        self.project(self.to_camera(world))
    }

    /// The nearest visible faces of the cube at `cell`.
    ///
    /// A face is dropped if any of its corners is at or behind the camera
    /// plane. Of the rest, the [`FACES_PER_CELL`] with the smallest mean corner
    /// distance are returned, nearest first.
    pub fn cube_faces(&self, cell: IVec3, color: Rgb) -> Vec<Face> {
        let center = cell.as_vec3();
        let corners = CUBE_CORNERS.map(|c| self.to_camera(center + c));

        let mut faces: Vec<Face> = CUBE_FACES
            .iter()
            .filter_map(|quad| {
                let cam = quad.map(|i| corners[i]);
                let points = [
                    self.project(cam[0])?,
                    self.project(cam[1])?,
                    self.project(cam[2])?,
                    self.project(cam[3])?,
                ];
                let depth = cam.iter().map(|v| v.length()).sum::<f32>() / 4.0;
                Some(Face {
                    cell,
                    points,
                    depth,
                    color,
                })
            })
            .collect();
        faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        faces.truncate(FACES_PER_CELL);
        faces
    }
}
