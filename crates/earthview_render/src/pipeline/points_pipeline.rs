//! Render pipeline for point clouds drawn as camera-facing sprites
//!
//! Each point is an instance; the vertex shader expands it into a quad of
//! six vertices. Blending and depth writes come from the material flags, so
//! one pipeline is built per flag combination and cached.

use std::collections::HashMap;

use earthview_core::MaterialFlags;
use wgpu::util::DeviceExt;

use super::globals::{texture_entries, uniform_entry};
use super::mesh_pipeline::DEPTH_FORMAT;
use super::types::PointsUniforms;
use crate::texture::GpuTexture;

/// Vertices drawn per point
pub const VERTICES_PER_POINT: u32 = 6;

/// Flags that change the pipeline state; the rest are uniforms
fn pipeline_key(flags: MaterialFlags) -> MaterialFlags {
    flags & (MaterialFlags::TRANSPARENT | MaterialFlags::DEPTH_WRITE)
}

/// Sprite pipelines keyed by material flags
pub struct PointsPipeline {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    pipelines: HashMap<MaterialFlags, wgpu::RenderPipeline>,
}

impl PointsPipeline {
    pub fn new(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let [sprite, sprite_sampler] = texture_entries(1, wgpu::TextureViewDimension::D2);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                sprite,
                sprite_sampler,
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/points.wgsl").into()),
        });

        Self {
            bind_group_layout,
            pipeline_layout,
            shader,
            color_format,
            pipelines: HashMap::new(),
        }
    }

    /// Build the pipeline for `flags` if it does not exist yet
    pub fn ensure(&mut self, device: &wgpu::Device, flags: MaterialFlags) {
        let key = pipeline_key(flags);
        if !self.pipelines.contains_key(&key) {
            log::debug!("Creating points pipeline for {:?}", key);
            let pipeline = self.create_pipeline(device, key);
            self.pipelines.insert(key, pipeline);
        }
    }

    /// The pipeline for `flags`, if [`ensure`](Self::ensure) has built it
    pub fn get(&self, flags: MaterialFlags) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&pipeline_key(flags))
    }

    /// Number of cached pipelines
    pub fn cached_count(&self) -> usize {
        self.pipelines.len()
    }

    fn create_pipeline(&self, device: &wgpu::Device, key: MaterialFlags) -> wgpu::RenderPipeline {
        let blend = if key.contains(MaterialFlags::TRANSPARENT) {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::instance_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: key.contains(MaterialFlags::DEPTH_WRITE),
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // center: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
            ],
        }
    }

    /// Create the per-cloud bind group; returns it with its uniform buffer
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        uniforms: &PointsUniforms,
        sprite: &GpuTexture,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Uniform Buffer"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sprite.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sprite.sampler),
                },
            ],
        });

        (buffer, bind_group)
    }
}
