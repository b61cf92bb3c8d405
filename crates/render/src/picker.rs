use cellspace_kernel::VoxelWorld;
use glam::{IVec3, Vec2, Vec3};

use crate::camera::Camera;
use crate::projection::focal_length;

/// Most voxels a single pick ray steps through along any axis.
pub const MAX_TRAVERSAL: i32 = 1 << 16;

/// A voxel crossed by a pick ray, with the ray parameter at entry.
/// The voxel holding the ray origin has `t = -1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayVoxel {
    pub coord: IVec3,
    pub t: f32,
}

impl RayVoxel {
    pub fn is_origin(&self) -> bool {
        self.t < 0.0
    }
}

/// Turns screen positions into the voxels under them.
#[derive(Debug, Clone, Copy)]
pub struct Picker {
    width: u32,
    height: u32,
}

impl Picker {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Unit world direction through the screen point.
    pub fn ray(&self, camera: &Camera, screen: Vec2) -> Vec3 {
        let f = focal_length(self.width, camera.fov_degrees);
        let local = Vec3::new(
            (screen.x - self.width as f32 / 2.0) / f,
            (self.height as f32 / 2.0 - screen.y) / f,
            1.0,
        );
        (camera.rotation() * local)
            .try_normalize()
            .unwrap_or_else(|| camera.forward())
    }

    /// Voxels along the ray through `screen`, nearest first.
    pub fn cast(&self, camera: &Camera, screen: Vec2) -> Vec<RayVoxel> {
        traverse(camera.position, self.ray(camera, screen), camera.render_distance)
    }

    /// First occupied voxel along a cast, with its index.
    pub fn first_hit(voxels: &[RayVoxel], world: &VoxelWorld) -> Option<usize> {
        voxels.iter().position(|v| world.is_occupied(v.coord))
    }
}

/// Amanatides-Woo traversal from `origin` along `dir`.
///
/// The voxel containing the origin comes first with `t = -1`, followed by
/// every voxel entered, in order of entry. Traversal stops once `t` exceeds
/// `render_distance`, once a voxel leaves the render distance on any axis, or
/// after `2 * render_distance + 1` steps. Render distances beyond
/// [`MAX_TRAVERSAL`] are traversed as `MAX_TRAVERSAL`.
pub fn traverse(origin: Vec3, dir: Vec3, render_distance: i32) -> Vec<RayVoxel> {
    let start = origin.round().as_ivec3();
    let mut out = vec![RayVoxel { coord: start, t: -1.0 }];
    let reach = render_distance.clamp(0, MAX_TRAVERSAL);
    if !origin.is_finite() || !dir.is_finite() || dir == Vec3::ZERO {
        return out;
    }

    let mut step = IVec3::ZERO;
    let mut t_max = Vec3::INFINITY;
    let mut t_delta = Vec3::INFINITY;
    for i in 0..3 {
        let d = dir[i];
        if d > 0.0 {
            step[i] = 1;
            t_max[i] = (start[i] as f32 + 0.5 - origin[i]) / d;
            t_delta[i] = 1.0 / d;
        } else if d < 0.0 {
            step[i] = -1;
            t_max[i] = (start[i] as f32 - 0.5 - origin[i]) / d;
            t_delta[i] = -1.0 / d;
        }
    }

    let mut voxel = start;
    for _ in 0..2 * reach + 1 {
        let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            0
        } else if t_max.y <= t_max.z {
            1
        } else {
            2
        };
        let t = t_max[axis];
        if !t.is_finite() || t > reach as f32 {
            break;
        }
        let next = voxel[axis].saturating_add(step[axis]);
        if next == voxel[axis] || (next as i64 - start[axis] as i64).abs() > reach as i64 {
            break;
        }
        voxel[axis] = next;
        out.push(RayVoxel { coord: voxel, t });
        t_max[axis] += t_delta[axis];
    }

    out.sort_by(|a, b| a.t.total_cmp(&b.t));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellspace_rules::{LifeCell, PlaneSet};

    #[test]
    fn straight_ray_visits_each_voxel_once() {
        let voxels = traverse(Vec3::ZERO, Vec3::Z, 10);
        assert_eq!(voxels.len(), 11);
        assert_eq!(voxels[0], RayVoxel { coord: IVec3::ZERO, t: -1.0 });
        assert_eq!(voxels[1], RayVoxel { coord: IVec3::new(0, 0, 1), t: 0.5 });
        assert_eq!(voxels[2], RayVoxel { coord: IVec3::new(0, 0, 2), t: 1.5 });
        assert_eq!(voxels[10].coord, IVec3::new(0, 0, 10));
    }

    #[test]
    fn screen_center_casts_along_forward() {
        let picker = Picker::new(800, 600);
        let camera = Camera {
            render_distance: 10,
            ..Camera::default()
        };
        let voxels = picker.cast(&camera, Vec2::new(400.0, 300.0));
        let expected = traverse(Vec3::ZERO, Vec3::Z, 10);
        assert_eq!(voxels, expected);
        // deterministic
        assert_eq!(picker.cast(&camera, Vec2::new(400.0, 300.0)), voxels);
    }

    #[test]
    fn screen_edges_tilt_the_ray() {
        let picker = Picker::new(800, 600);
        let camera = Camera::default();
        let right = picker.ray(&camera, Vec2::new(800.0, 300.0));
        assert!((right - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-5);
        let top = picker.ray(&camera, Vec2::new(400.0, 0.0));
        assert!(top.y > 0.0);
    }

    #[test]
    fn diagonal_rays_move_one_axis_per_step() {
        let voxels = traverse(Vec3::new(0.1, 0.2, 0.0), Vec3::new(1.0, 1.0, 1.0), 6);
        for pair in voxels.windows(2) {
            let d = (pair[1].coord - pair[0].coord).abs();
            assert_eq!(d.x + d.y + d.z, 1);
            assert!(pair[0].t <= pair[1].t);
        }
        assert_eq!(voxels.len(), 2 * 6 + 2);
    }

    #[test]
    fn traversal_respects_render_distance() {
        assert_eq!(traverse(Vec3::ZERO, Vec3::NEG_X, 0).len(), 1);
        let voxels = traverse(Vec3::new(0.0, 0.0, 0.4), Vec3::NEG_Y, 3);
        assert!(voxels.iter().all(|v| v.coord.y >= -3 && v.t <= 3.0));
        assert_eq!(voxels.last().map(|v| v.coord), Some(IVec3::new(0, -3, 0)));
    }

    #[test]
    fn huge_render_distances_are_capped() {
        let voxels = traverse(Vec3::ZERO, Vec3::Z, i32::MAX);
        assert_eq!(voxels.len(), MAX_TRAVERSAL as usize + 1);
        assert_eq!(voxels.last().map(|v| v.coord.z), Some(MAX_TRAVERSAL));
    }

    #[test]
    fn rays_stop_at_the_edge_of_the_grid() {
        let edge = Vec3::new(i32::MAX as f32, 0.0, 0.0);
        let voxels = traverse(edge, Vec3::X, i32::MAX);
        assert_eq!(voxels.len(), 1);
        assert_eq!(voxels[0].coord.x, i32::MAX);
    }

    #[test]
    fn degenerate_directions_only_yield_the_origin() {
        assert_eq!(traverse(Vec3::ONE, Vec3::ZERO, 5).len(), 1);
        assert_eq!(traverse(Vec3::ONE, Vec3::splat(f32::NAN), 5).len(), 1);
    }

    #[test]
    fn first_hit_finds_the_nearest_occupied_voxel() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::new(0, 0, 4), LifeCell::alive(PlaneSet::ALL));
        world.spawn(IVec3::new(0, 0, 7), LifeCell::alive(PlaneSet::ALL));
        let voxels = traverse(Vec3::ZERO, Vec3::Z, 10);
        assert_eq!(Picker::first_hit(&voxels, &world), Some(4));
        assert_eq!(Picker::first_hit(&voxels[..3], &world), None);
    }
}
