//! Earthview - a textured Earth under a starfield or skybox
//!
//! Drag to orbit, right drag (or Shift + drag) to pan, scroll to zoom.
//! H toggles the debug panel, R resets the camera, F toggles fullscreen,
//! Escape quits.

use std::error::Error;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use earthview::config::AppConfig;
use earthview::input::{InputAction, InputMapper};
use earthview::scene::load_scene;
use earthview::systems::{
    DebugSettings, DebugUi, RenderError, RenderSystem, SimulationSystem, WindowSystem,
};
use earthview_core::World;
use earthview_input::OrbitController;
use earthview_render::PerspectiveCamera;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    world: World,
    camera: PerspectiveCamera,
    controller: OrbitController,
    settings: DebugSettings,
    simulation: SimulationSystem,
    /// Last cursor position, for drag deltas
    cursor: Option<(f64, f64)>,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    debug_ui: Option<DebugUi>,
}

impl App {
    fn new() -> Self {
        // Load configuration
        let config = AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        });

        let scene = load_scene(&config.scene);
        let world = scene.instantiate();

        let mut camera = config.camera.to_camera(1.0);
        if let Some(position) = scene.camera_position {
            camera.position = position;
        }

        let controller = config.controls.to_controller();

        let mut settings = DebugSettings::from_config(&config.debug);
        SimulationSystem::sync_settings(&world, &camera, &mut settings);

        Self {
            config,
            world,
            camera,
            controller,
            settings,
            simulation: SimulationSystem::new(),
            cursor: None,
            window: None,
            render: None,
            debug_ui: None,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => {
                log::info!("Exiting");
                event_loop.exit();
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ToggleDebugPanel => {
                if let Some(debug_ui) = &mut self.debug_ui {
                    debug_ui.toggle();
                }
            }
            InputAction::ResetCamera => {
                if self.controller.restore(&mut self.camera) {
                    log::info!("Camera reset to starting position");
                }
            }
        }
    }

    fn resize(&mut self) {
        let (Some(window), Some(render)) = (&self.window, &mut self.render) else {
            return;
        };
        let window = window.window();
        let size = window.inner_size();
        render.resize(size, window.scale_factor(), &mut self.camera);
        self.controller.set_viewport_height(size.height);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render), Some(debug_ui)) =
            (&self.window, &mut self.render, &mut self.debug_ui)
        else {
            return;
        };

        let frame = self.simulation.advance();
        self.controller.update(&mut self.camera, frame.dt);

        let edits = debug_ui.run(window.window(), &mut self.settings);
        SimulationSystem::apply_edits(&mut self.world, &mut self.camera, &self.settings, edits);
        SimulationSystem::tick(&mut self.world, &self.settings, frame);
        SimulationSystem::sync_settings(&self.world, &self.camera, &mut self.settings);

        match render.render_frame(&self.camera, &self.world, debug_ui) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::debug!("Surface reconfigured; skipping frame"),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }
        self.world.clear_all_dirty();

        if let Some(fps) = self.simulation.take_fps_report() {
            window.update_title(fps);
        }

        // Request next frame
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            &self.world,
            &self.config.window,
            &self.config.rendering,
        ) {
            Ok(render) => render,
            Err(e) => {
                log::error!("Failed to initialise GPU: {}", e);
                event_loop.exit();
                return;
            }
        };

        let debug_ui = DebugUi::new(
            render.device(),
            render.surface_format(),
            window.window(),
            self.config.debug.show_panel,
        );

        let (width, height) = render.size();
        self.camera.set_aspect(width, height);
        self.controller.set_viewport_height(height);
        self.controller.save_state(&self.camera);

        window.request_redraw();
        self.window = Some(window);
        self.render = Some(render);
        self.debug_ui = Some(debug_ui);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ui_consumed = match (&self.window, &mut self.debug_ui) {
            (Some(window), Some(debug_ui)) => debug_ui.on_window_event(window.window(), &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if ui_consumed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, event.repeat) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.controller.set_shift(modifiers.state().shift_key());
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if InputMapper::pointer_to_controls(ui_consumed, Some(state)) {
                    self.controller.process_mouse_button(button, state);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace((position.x, position.y));
                if let Some((x, y)) = previous {
                    if InputMapper::pointer_to_controls(ui_consumed, None) {
                        self.controller
                            .process_mouse_motion(position.x - x, position.y - y);
                    }
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if InputMapper::pointer_to_controls(ui_consumed, None) {
                    self.controller.process_scroll(delta);
                }
            }

            WindowEvent::Focused(false) => {
                // A drag can end outside the window without a release event
                self.controller
                    .process_mouse_button(winit::event::MouseButton::Left, ElementState::Released);
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting Earthview");

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
