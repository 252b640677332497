//! Scene renderer
//!
//! Owns the scene pipelines, the depth buffer and, on displays denser than
//! the pixel ratio cap, the offscreen scene target and its blit.

use earthview_core::World;

use crate::camera::PerspectiveCamera;
use crate::context::RenderContext;
use crate::pipeline::{
    BlitPipeline, CameraUniforms, GlobalBindings, LightUniforms, MeshPipeline, PointsPipeline,
    SkyboxPipeline,
};
use crate::renderable::RenderableScene;
use crate::target::{effective_pixel_ratio, scene_size, DepthBuffer, RenderTarget};

/// Pipelines used to draw a [`RenderableScene`]
pub struct ScenePipelines {
    pub globals: GlobalBindings,
    pub mesh: MeshPipeline,
    pub points: PointsPipeline,
    pub skybox: SkyboxPipeline,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let globals = GlobalBindings::new(device);
        let mesh = MeshPipeline::new(device, globals.layout(), color_format);
        let points = PointsPipeline::new(device, globals.layout(), color_format);
        let skybox = SkyboxPipeline::new(device, globals.layout(), color_format);
        Self {
            globals,
            mesh,
            points,
            skybox,
        }
    }
}

struct Offscreen {
    target: RenderTarget,
    blit_group: wgpu::BindGroup,
}

pub struct SceneRenderer {
    pipelines: ScenePipelines,
    blit: BlitPipeline,
    depth: DepthBuffer,
    offscreen: Option<Offscreen>,
    format: wgpu::TextureFormat,
    surface_size: (u32, u32),
    scale_factor: f64,
    max_pixel_ratio: f64,
}

impl SceneRenderer {
    pub fn new(context: &RenderContext, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let format = context.format();
        let mut renderer = Self {
            pipelines: ScenePipelines::new(&context.device, format),
            blit: BlitPipeline::new(&context.device, format),
            depth: DepthBuffer::new(),
            offscreen: None,
            format,
            surface_size: (0, 0),
            scale_factor,
            max_pixel_ratio,
        };
        renderer.resize(
            &context.device,
            context.config.width,
            context.config.height,
            scale_factor,
        );
        renderer
    }

    /// Follow a surface resize or scale factor change
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32, scale_factor: f64) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_size = (width, height);
        self.scale_factor = scale_factor;

        self.offscreen = scene_size((width, height), scale_factor, self.max_pixel_ratio).map(|(w, h)| {
            log::info!(
                "Rendering scene at {}x{} for a {}x{} surface",
                w,
                h,
                width,
                height
            );
            let target = RenderTarget::new(device, self.format, w, h);
            let blit_group = self.blit.bind_group(device, target.view());
            Offscreen { target, blit_group }
        });

        let (w, h) = self.target_size();
        self.depth.ensure(device, w, h);
    }

    /// Size in pixels the scene is rendered at
    pub fn target_size(&self) -> (u32, u32) {
        match &self.offscreen {
            Some(offscreen) => offscreen.target.size(),
            None => self.surface_size,
        }
    }

    /// Scene pixels per logical pixel
    pub fn pixel_ratio(&self) -> f32 {
        effective_pixel_ratio(self.scale_factor, self.max_pixel_ratio) as f32
    }

    pub fn is_downscaled(&self) -> bool {
        self.offscreen.is_some()
    }

    pub fn pipelines(&self) -> &ScenePipelines {
        &self.pipelines
    }

    pub fn pipelines_mut(&mut self) -> &mut ScenePipelines {
        &mut self.pipelines
    }

    /// Upload camera and light uniforms for the next frame
    pub fn prepare(&self, queue: &wgpu::Queue, camera: &PerspectiveCamera, world: &World) {
        let camera_uniforms = CameraUniforms::new(camera, self.target_size(), self.pixel_ratio());
        self.pipelines.globals.update_camera(queue, &camera_uniforms);
        self.pipelines
            .globals
            .update_lights(queue, &LightUniforms::from_lights(world.lights()));
    }

    /// Draw the scene into `surface_view`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        scene: &RenderableScene,
    ) {
        let Some(depth_view) = self.depth.view() else {
            log::warn!("Depth buffer missing; skipping scene");
            return;
        };
        let color_view = match &self.offscreen {
            Some(offscreen) => offscreen.target.view(),
            None => surface_view,
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, self.pipelines.globals.bind_group(), &[]);
            scene.draw(&mut pass, &self.pipelines);
        }

        if let Some(offscreen) = &self.offscreen {
            self.blit.blit(encoder, surface_view, &offscreen.blit_group);
        }
    }
}
