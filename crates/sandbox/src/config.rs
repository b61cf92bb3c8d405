use cellspace_common::{CellspaceError, Rgb};
use cellspace_kernel::DEFAULT_EVENT_CAPACITY;
use cellspace_render::Camera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] CellspaceError),
}

/// Starting camera. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
    pub fov_degrees: f32,
    pub move_speed: f32,
    /// Degrees per second.
    pub rotate_speed_degrees: f32,
    pub render_distance: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -15.0],
            pitch_degrees: 0.0,
            yaw_degrees: 0.0,
            fov_degrees: 90.0,
            move_speed: 5.0,
            rotate_speed_degrees: 90.0,
            render_distance: 30,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            position: Vec3::from_array(self.position),
            pitch: self.pitch_degrees.to_radians(),
            yaw: self.yaw_degrees.to_radians(),
            fov_degrees: self.fov_degrees,
            move_speed: self.move_speed,
            rotate_speed: self.rotate_speed_degrees.to_radians(),
            render_distance: self.render_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    /// Draw darker outlines around faces.
    pub outline: bool,
    /// Catalog name of the rule placed by primary clicks.
    pub selected_rule: Option<String>,
    /// Automaton cycles per second of frame time; 0 only cycles on demand.
    pub cycles_per_second: f32,
    pub max_cycles_per_frame: u32,
    /// Upper bound on a single frame's time step, in milliseconds.
    pub max_frame_step_ms: u64,
    pub start_paused: bool,
    /// World events kept pending before the oldest are dropped.
    pub event_capacity: usize,
    pub camera: CameraConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgb::BLACK,
            outline: true,
            selected_rule: Some("alive-xy".into()),
            cycles_per_second: 15.0,
            max_cycles_per_frame: 6,
            max_frame_step_ms: 100,
            start_paused: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            camera: CameraConfig::default(),
        }
    }
}

impl SandboxConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded sandbox config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn max_frame_step(&self) -> Duration {
        Duration::from_millis(self.max_frame_step_ms)
    }

    pub fn validate(&self) -> Result<(), CellspaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(CellspaceError::InvalidFrameSize {
                width: self.width,
                height: self.height,
            });
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must lie strictly between 0 and 180"));
        }
        for (field, value) in [
            ("camera.move_speed", cam.move_speed),
            ("camera.rotate_speed_degrees", cam.rotate_speed_degrees),
            ("cycles_per_second", self.cycles_per_second),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if cam.render_distance < 0 {
            return Err(invalid("camera.render_distance", "must not be negative"));
        }
        if cam.position.iter().any(|c| !c.is_finite()) {
            return Err(invalid("camera.position", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> CellspaceError {
    CellspaceError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
