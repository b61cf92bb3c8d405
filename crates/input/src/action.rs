use crate::keys::MoveKey;

/// A high-level user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Place the selected rule in front of whatever is under the pointer.
    Primary { x: f32, y: f32 },
    /// Remove the cell under the pointer.
    Secondary { x: f32, y: f32 },
    KeyDown(MoveKey),
    KeyUp(MoveKey),
    /// Field of view in degrees.
    SetFov(f32),
    SetMoveSpeed(f32),
    SetRotateSpeed(f32),
    SetRenderDistance(i32),
    /// Select the rule placed by primary clicks, by catalog name.
    SelectRule(String),
    /// Clear every cell. The cycle counter is kept.
    Reset,
    TogglePause,
}
