use cellspace_common::CellBox;
use glam::{IVec3, Mat3, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Orientation of a camera with the given pitch and yaw, in radians.
///
/// Pitch rotates about x first, then yaw about y. The result maps
/// camera-local directions to world directions; its transpose maps world
/// offsets into camera space. Positive pitch tilts the view downward and
/// positive yaw turns it from +z toward +x.
pub fn rotation_matrix(pitch: f32, yaw: f32) -> Mat3 {
    Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(pitch)
}

/// Fly camera. Looks down +z in its own frame, with +y up and +x right.
///
/// Camera motion is not part of world state; it only decides what is seen
/// and which cells the rules are allowed to observe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub rotate_speed: f32,
    /// Chebyshev radius, in cells, around the camera voxel.
    pub render_distance: i32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            fov_degrees: 90.0,
            move_speed: 5.0,
            rotate_speed: 1.5,
            render_distance: 20,
        }
    }
}

impl Camera {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn rotation(&self) -> Mat3 {
        rotation_matrix(self.pitch, self.yaw)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// World point in camera space.
    pub fn to_camera(&self, world: Vec3) -> Vec3 {
        self.rotation().transpose() * (world - self.position)
    }

    /// Move along a direction given in the camera's own frame.
    ///
    /// The direction is normalized first, so diagonal input is not faster.
    pub fn translate(&mut self, local_dir: Vec3, dt: f32) {
        let Some(dir) = local_dir.try_normalize() else {
            return;
        };
        self.position += self.rotation() * dir * self.move_speed * dt;
    }

    /// Turn by `pitch_dir` and `yaw_dir` units of the rotate speed.
    /// Pitch stays within straight down and straight up.
    pub fn rotate(&mut self, pitch_dir: f32, yaw_dir: f32, dt: f32) {
        let step = self.rotate_speed * dt;
        self.pitch = (self.pitch + pitch_dir * step).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.yaw += yaw_dir * step;
    }

    pub fn set_fov(&mut self, degrees: f32) {
        self.fov_degrees = degrees;
    }

    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed.max(0.0);
    }

    pub fn set_rotate_speed(&mut self, speed: f32) {
        self.rotate_speed = speed.max(0.0);
    }

    pub fn set_render_distance(&mut self, distance: i32) {
        self.render_distance = distance.max(0);
    }

    /// The voxel the camera is in.
    pub fn voxel(&self) -> IVec3 {
        self.position.round().as_ivec3()
    }

    /// True if `coord` lies within render distance of the camera voxel on
    /// every axis.
    pub fn sees(&self, coord: IVec3) -> bool {
        let voxel = self.voxel();
        let reach = self.render_distance as i64;
        (0..3).all(|i| (coord[i] as i64 - voxel[i] as i64).abs() <= reach)
    }

    /// Box of cells the camera sees; used as the world horizon.
    pub fn horizon(&self) -> CellBox {
        CellBox::around(self.voxel(), self.render_distance)
    }
}
