//! Application systems
//!
//! The window, per-frame simulation, debug panel and rendering, kept apart
//! from main.rs so each can be tested on its own.

mod debug_ui;
mod render;
mod simulation;
mod window;

pub use debug_ui::{DebugSettings, DebugUi, PanelEdits};
pub use render::{RenderError, RenderSystem};
pub use simulation::{spin_scale, FrameTime, SimulationSystem, EARTH_NAME};
pub use window::{WindowError, WindowSystem};
