use cellspace_common::CellspaceError;
use cellspace_input::{Action, FrameClock, HeldKeys};
use cellspace_kernel::{AutomatonEngine, CycleReport, VoxelWorld, WorldEvent};
use cellspace_render::{
    Camera, DebugTextRenderer, Frame, Picker, RayVoxel, Renderer, SoftwareRenderer,
};
use cellspace_rules::RuleCatalog;
use cellspace_tools::{WorldInspector, WorldSummary};
use glam::{IVec3, Vec2};
use std::time::{Duration, Instant};

use crate::config::{ConfigError, SandboxConfig};
use crate::scenario::Scenario;

/// Frame history kept by the sandbox clock.
const CLOCK_WINDOW: usize = 60;

/// The interactive environment.
///
/// Owns the world and the engine, holds the camera and the rule selected for
/// placement, and turns [`Action`]s into camera moves and world edits.
pub struct Sandbox {
    world: VoxelWorld,
    engine: AutomatonEngine,
    catalog: RuleCatalog,
    camera: Camera,
    picker: Picker,
    renderer: SoftwareRenderer,
    keys: HeldKeys,
    clock: FrameClock,
    selected: Option<String>,
    paused: bool,
    /// Seconds per automaton cycle; zero disables timed cycling.
    cycle_interval: f32,
    max_cycles_per_frame: usize,
    accumulator: f32,
}

impl Sandbox {
    pub fn new(config: &SandboxConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, RuleCatalog::standard())
    }

    pub fn with_catalog(config: &SandboxConfig, catalog: RuleCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(name) = &config.selected_rule {
            if !catalog.contains(name) {
                return Err(CellspaceError::UnknownRule(name.clone()).into());
            }
        }
        let renderer = SoftwareRenderer::new(config.width, config.height)?
            .with_background(config.background)
            .with_outline(config.outline);
        let cycle_interval = if config.cycles_per_second > 0.0 {
            1.0 / config.cycles_per_second
        } else {
            0.0
        };

        let mut world = VoxelWorld::new();
        world.set_event_capacity(config.event_capacity);
        let mut sandbox = Self {
            world,
            engine: AutomatonEngine::new(),
            catalog,
            camera: config.camera.to_camera(),
            picker: Picker::new(config.width, config.height),
            renderer,
            keys: HeldKeys::new(),
            clock: FrameClock::new(config.max_frame_step(), CLOCK_WINDOW),
            selected: config.selected_rule.clone(),
            paused: config.start_paused,
            cycle_interval,
            max_cycles_per_frame: config.max_cycles_per_frame as usize,
            accumulator: 0.0,
        };
        sandbox.sync_horizon();
        Ok(sandbox)
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    pub fn engine(&self) -> &AutomatonEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selected_rule(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Mean raw frame time over recent frames.
    pub fn average_frame_time(&self) -> Duration {
        self.clock.average()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }

    /// Apply one user action.
    pub fn apply(&mut self, action: Action) -> Result<(), CellspaceError> {
        match action {
            Action::Primary { x, y } => {
                self.primary_click(Vec2::new(x, y));
            }
            Action::Secondary { x, y } => {
                self.secondary_click(Vec2::new(x, y));
            }
            Action::KeyDown(key) => self.keys.press(key),
            Action::KeyUp(key) => self.keys.release(key),
            Action::SetFov(degrees) => {
                self.camera.set_fov(degrees);
                tracing::info!(degrees, "field of view set");
            }
            Action::SetMoveSpeed(speed) => {
                self.camera.set_move_speed(speed);
                tracing::info!(speed = self.camera.move_speed, "move speed set");
            }
            Action::SetRotateSpeed(speed) => {
                self.camera.set_rotate_speed(speed);
                tracing::info!(speed = self.camera.rotate_speed, "rotate speed set");
            }
            Action::SetRenderDistance(distance) => {
                self.camera.set_render_distance(distance);
                self.sync_horizon();
                tracing::info!(distance = self.camera.render_distance, "render distance set");
            }
            Action::SelectRule(name) => {
                if !self.catalog.contains(&name) {
                    return Err(CellspaceError::UnknownRule(name));
                }
                tracing::info!(rule = %name, "rule selected");
                self.selected = Some(name);
            }
            Action::Reset => self.reset(),
            Action::TogglePause => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "pause toggled");
            }
        }
        Ok(())
    }

    /// Voxels under a screen point, nearest first.
    pub fn pick(&self, screen: Vec2) -> Vec<RayVoxel> {
        self.picker.cast(&self.camera, screen)
    }

    /// Place the selected rule in the last empty voxel before the first
    /// occupied one, or in the camera voxel when the ray hits nothing.
    /// Nothing happens if the camera voxel itself is occupied.
    ///
    /// Returns the coordinate of the new cell.
    pub fn primary_click(&mut self, screen: Vec2) -> Option<IVec3> {
        let name = self.selected.clone()?;
        let voxels = self.pick(screen);
        let target = match Picker::first_hit(&voxels, &self.world) {
            Some(0) => return None,
            Some(i) => voxels[i - 1].coord,
            None => voxels.first()?.coord,
        };
        let rule = match self.catalog.create(&name) {
            Ok(rule) => rule,
            Err(err) => {
                tracing::warn!(%err, "selected rule unavailable");
                return None;
            }
        };
        self.world.spawn_boxed(target, rule)?;
        tracing::info!(rule = %name, x = target.x, y = target.y, z = target.z, "cell placed");
        Some(target)
    }

    /// Delete the first occupied voxel under a screen point, unless it is the
    /// camera voxel. Returns the coordinate removed.
    pub fn secondary_click(&mut self, screen: Vec2) -> Option<IVec3> {
        let voxels = self.pick(screen);
        let hit = voxels[Picker::first_hit(&voxels, &self.world)?];
        if hit.is_origin() || !self.world.delete(hit.coord) {
            return None;
        }
        tracing::info!(x = hit.coord.x, y = hit.coord.y, z = hit.coord.z, "cell removed");
        Some(hit.coord)
    }

    /// Spawn a catalog rule at an absolute coordinate. `Ok(false)` if the
    /// voxel is occupied.
    pub fn spawn_named(&mut self, coord: IVec3, name: &str) -> Result<bool, CellspaceError> {
        let rule = self.catalog.create(name)?;
        Ok(self.world.spawn_boxed(coord, rule).is_some())
    }

    /// Spawn a scenario's cells. Returns how many were placed.
    pub fn seed(&mut self, scenario: &Scenario) -> Result<usize, CellspaceError> {
        let mut placed = 0;
        for (coord, name) in scenario.cells() {
            if self.spawn_named(coord, name)? {
                placed += 1;
            }
        }
        tracing::info!(scenario = scenario.name(), placed, "scenario seeded");
        Ok(placed)
    }

    /// Advance one wall-clock frame.
    pub fn frame(&mut self, now: Instant) -> Vec<CycleReport> {
        let dt = self.clock.tick(now);
        self.update(dt)
    }

    /// Move the camera by the held keys, then run as many timed cycles as
    /// `dt` pays for, up to the per-frame limit.
    pub fn update(&mut self, dt: f32) -> Vec<CycleReport> {
        let max_step = self.clock.max_step().as_secs_f32();
        let dt = if dt.is_finite() { dt.clamp(0.0, max_step) } else { 0.0 };

        if !self.keys.is_idle() {
            let (pitch, yaw) = self.keys.rotation();
            self.camera.rotate(pitch, yaw, dt);
            self.camera.translate(self.keys.translation(), dt);
            self.sync_horizon();
        }

        if self.paused || self.cycle_interval <= 0.0 {
            return Vec::new();
        }
        self.accumulator += dt;
        let mut reports = Vec::new();
        while self.accumulator >= self.cycle_interval && reports.len() < self.max_cycles_per_frame {
            self.accumulator -= self.cycle_interval;
            reports.push(self.engine.cycle(&mut self.world));
        }
        if reports.len() == self.max_cycles_per_frame {
            self.accumulator = self.accumulator.min(self.cycle_interval);
        }
        reports
    }

    /// Run one cycle now, paused or not.
    pub fn cycle(&mut self) -> CycleReport {
        self.sync_horizon();
        self.engine.cycle(&mut self.world)
    }

    /// Run cycles up to the next tick boundary.
    pub fn step(&mut self) -> Vec<CycleReport> {
        self.sync_horizon();
        self.engine.step(&mut self.world)
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Vec<CycleReport> {
        let _span = tracing::info_span!("run_ticks", ticks).entered();
        let mut reports = Vec::new();
        for _ in 0..ticks {
            reports.extend(self.step());
        }
        reports
    }

    /// Remove every cell. Camera, selection and the cycle counter are kept.
    pub fn reset(&mut self) {
        let removed = self.world.len();
        self.world.clear();
        self.engine.on_cells_cleared();
        self.accumulator = 0.0;
        tracing::info!(removed, "sandbox reset");
    }

    pub fn render(&self) -> Frame {
        self.renderer.render(&self.world, &self.camera)
    }

    pub fn render_text(&self) -> String {
        DebugTextRenderer::new().render(&self.world, &self.camera)
    }

    pub fn summary(&self) -> WorldSummary {
        WorldInspector::summary(&self.world, &self.engine)
    }

    fn sync_horizon(&mut self) {
        self.world.set_horizon(Some(self.camera.horizon()));
    }
}
