//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Scene pipelines and renderables
//! - Frame rendering (scene, then debug panel)

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;
use earthview_core::World;
use earthview_render::{
    ContextError, PerspectiveCamera, RenderContext, RenderableScene, SceneRenderer, TextureLibrary,
};
use crate::config::{RenderingConfig, WindowConfig};
use super::debug_ui::DebugUi;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost or outdated and has been reconfigured
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    renderer: SceneRenderer,
    scene: RenderableScene,
}

impl RenderSystem {
    /// Create the GPU context and upload `world`
    pub fn new(
        window: Arc<Window>,
        world: &World,
        window_config: &WindowConfig,
        render_config: &RenderingConfig,
    ) -> Result<Self, ContextError> {
        let scale_factor = window.scale_factor();
        let context = pollster::block_on(RenderContext::with_vsync(window, window_config.vsync))?;

        let mut renderer = SceneRenderer::new(&context, scale_factor, render_config.max_pixel_ratio);
        let mut textures = TextureLibrary::new(&render_config.asset_dir);
        let scene = RenderableScene::build(
            &context.device,
            &context.queue,
            world,
            renderer.pipelines_mut(),
            &mut textures,
        );

        log::info!(
            "Renderer ready: surface {}x{}, scene {}x{} (pixel ratio {:.2})",
            context.config.width,
            context.config.height,
            renderer.target_size().0,
            renderer.target_size().1,
            renderer.pixel_ratio()
        );

        Ok(Self {
            context,
            renderer,
            scene,
        })
    }

    /// Handle window resize or scale factor change
    pub fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64, camera: &mut PerspectiveCamera) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.context.resize(size);
        self.renderer
            .resize(&self.context.device, size.width, size.height, scale_factor);
        camera.set_aspect(size.width, size.height);
    }

    /// Render a single frame
    pub fn render_frame(
        &mut self,
        camera: &PerspectiveCamera,
        world: &World,
        debug_ui: &mut DebugUi,
    ) -> Result<(), RenderError> {
        self.renderer.prepare(&self.context.queue, camera, world);
        self.scene.sync(&self.context.queue, world);

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &self.scene);
        debug_ui.paint(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &view,
            [self.context.config.width, self.context.config.height],
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.context.format()
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}
