use glam::Vec3;
use std::collections::HashSet;

/// Keys that move or turn the camera while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
}

impl MoveKey {
    pub const ALL: [MoveKey; 10] = [
        MoveKey::Forward,
        MoveKey::Backward,
        MoveKey::Left,
        MoveKey::Right,
        MoveKey::Up,
        MoveKey::Down,
        MoveKey::PitchUp,
        MoveKey::PitchDown,
        MoveKey::YawLeft,
        MoveKey::YawRight,
    ];

    /// Contribution to the camera-local movement direction.
    fn translation(self) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::Z,
            MoveKey::Backward => Vec3::NEG_Z,
            MoveKey::Left => Vec3::NEG_X,
            MoveKey::Right => Vec3::X,
            MoveKey::Up => Vec3::Y,
            MoveKey::Down => Vec3::NEG_Y,
            _ => Vec3::ZERO,
        }
    }

    /// Contribution to (pitch, yaw) turning. Positive pitch looks down.
    fn rotation(self) -> (f32, f32) {
        match self {
            MoveKey::PitchUp => (-1.0, 0.0),
            MoveKey::PitchDown => (1.0, 0.0),
            MoveKey::YawLeft => (0.0, -1.0),
            MoveKey::YawRight => (0.0, 1.0),
            _ => (0.0, 0.0),
        }
    }
}

/// Movement keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: HashSet<MoveKey>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: MoveKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }

    /// Summed camera-local direction; opposite keys cancel. Not normalized.
    pub fn translation(&self) -> Vec3 {
        self.held.iter().map(|k| k.translation()).sum()
    }

    /// Summed (pitch, yaw) turn directions.
    pub fn rotation(&self) -> (f32, f32) {
        self.held
            .iter()
            .map(|k| k.rotation())
            .fold((0.0, 0.0), |(p, y), (dp, dy)| (p + dp, y + dy))
    }
}
