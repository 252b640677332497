//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like Exit and ResetCamera.
//! Mouse buttons, motion and the wheel are NOT mapped here - they go
//! directly to the OrbitController unless the debug panel consumes them.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Show or hide the debug panel (H key)
    ToggleDebugPanel,
    /// Put the camera back at its starting position (R key)
    ResetCamera,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Only fresh presses map; releases and auto-repeats return `None`.
    pub fn map_keyboard(key: KeyCode, state: ElementState, repeat: bool) -> Option<InputAction> {
        if state != ElementState::Pressed || repeat {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyH => Some(InputAction::ToggleDebugPanel),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            _ => None,
        }
    }

    /// Whether a pointer event should reach the orbit controls
    ///
    /// Button releases always pass so a drag that ends over the panel
    /// still stops.
    pub fn pointer_to_controls(ui_consumed: bool, state: Option<ElementState>) -> bool {
        !ui_consumed || state == Some(ElementState::Released)
    }
}
