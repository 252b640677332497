//! Renderable scene - bridges World/Entity to GPU buffers
//!
//! Every entity gets its own vertex and uniform buffers. Transforms are
//! re-uploaded only for entities flagged dirty since the last frame.

use std::collections::HashMap;

use earthview_core::{
    Background, DirtyFlags, Entity, EntityKey, MaterialFlags, Object, PointsMaterial,
    StandardMaterial, World,
};
use earthview_math::SphereGeometry;
use wgpu::util::DeviceExt;

use crate::library::{Fallback, TextureLibrary};
use crate::pipeline::{
    MaterialTextures, MaterialUniforms, MeshVertex, ModelUniforms, PointsUniforms,
    VERTICES_PER_POINT,
};
use crate::renderer::ScenePipelines;

struct MeshRenderable {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    _material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
}

struct PointsRenderable {
    instance_buffer: wgpu::Buffer,
    count: u32,
    material: PointsMaterial,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    flags: MaterialFlags,
}

enum Renderable {
    Mesh(MeshRenderable),
    Points(PointsRenderable),
}

/// GPU resources for every entity of a world
pub struct RenderableScene {
    renderables: HashMap<EntityKey, Renderable>,
    /// Opaque meshes first, then point clouds
    draw_order: Vec<EntityKey>,
    sky: Option<wgpu::BindGroup>,
    clear_color: wgpu::Color,
}

impl RenderableScene {
    /// Upload all entities and the background of `world`
    pub fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        world: &World,
        pipelines: &mut ScenePipelines,
        textures: &mut TextureLibrary,
    ) -> Self {
        let mut renderables = HashMap::with_capacity(world.entity_count());

        for (key, entity) in world.iter() {
            let renderable = match &entity.object {
                Object::Mesh { geometry, material } => Renderable::Mesh(Self::build_mesh(
                    device, queue, entity, geometry, material, pipelines, textures,
                )),
                Object::Points { positions, material } => Renderable::Points(Self::build_points(
                    device, queue, entity, positions, material, pipelines, textures,
                )),
            };
            renderables.insert(key, renderable);
        }

        let draw_order = draw_order(world.iter().map(|(key, entity)| (key, &entity.object)));

        let sky = world.background().faces().map(|faces| {
            let cube = textures.cube(device, queue, faces);
            pipelines.skybox.bind_group(device, &cube)
        });

        log::info!(
            "Built renderables for {} entities{}",
            renderables.len(),
            if sky.is_some() { " with sky" } else { "" }
        );

        Self {
            renderables,
            draw_order,
            sky,
            clear_color: clear_color(world.background()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_mesh(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        entity: &Entity,
        geometry: &SphereGeometry,
        material: &StandardMaterial,
        pipelines: &ScenePipelines,
        textures: &mut TextureLibrary,
    ) -> MeshRenderable {
        let mesh = geometry.build();
        let vertices = MeshVertex::from_mesh(&mesh);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let albedo = textures.texture(device, queue, material.map.as_ref(), Fallback::White);
        let normal = textures.texture(device, queue, material.normal_map.as_ref(), Fallback::FlatNormal);
        let emissive = textures.texture(device, queue, material.emissive_map.as_ref(), Fallback::White);
        let roughness = textures.texture(device, queue, material.roughness_map.as_ref(), Fallback::White);

        let (material_buffer, material_bind_group) = pipelines.mesh.material_bind_group(
            device,
            &MaterialUniforms::from(material),
            &MaterialTextures {
                albedo: &albedo,
                normal: &normal,
                emissive: &emissive,
                roughness: &roughness,
            },
        );
        let (model_buffer, model_bind_group) =
            pipelines.mesh.model_bind_group(device, &ModelUniforms::from(&entity.transform));

        log::debug!(
            "Mesh {:?}: {} vertices, {} triangles",
            entity.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        MeshRenderable {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            model_buffer,
            model_bind_group,
            _material_buffer: material_buffer,
            material_bind_group,
        }
    }

    fn build_points(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        entity: &Entity,
        positions: &[[f32; 3]],
        material: &PointsMaterial,
        pipelines: &mut ScenePipelines,
        textures: &mut TextureLibrary,
    ) -> PointsRenderable {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Instance Buffer"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sprite = textures.texture(device, queue, material.map.as_ref(), Fallback::Sprite);
        let flags = material.flags();
        pipelines.points.ensure(device, flags);

        let (uniform_buffer, bind_group) = pipelines.points.bind_group(
            device,
            &PointsUniforms::new(material, &entity.transform),
            &sprite,
        );

        PointsRenderable {
            instance_buffer,
            count: positions.len() as u32,
            material: material.clone(),
            uniform_buffer,
            bind_group,
            flags,
        }
    }

    /// Upload transforms of entities marked dirty
    ///
    /// Dirty flags are left for the caller to clear.
    pub fn sync(&self, queue: &wgpu::Queue, world: &World) {
        for key in world.dirty_entities() {
            let Some(entity) = world.get_entity(key) else { continue };
            if !entity.dirty_flags().contains(DirtyFlags::TRANSFORM) {
                continue;
            }
            match self.renderables.get(&key) {
                Some(Renderable::Mesh(mesh)) => {
                    let uniforms = ModelUniforms::from(&entity.transform);
                    queue.write_buffer(&mesh.model_buffer, 0, bytemuck::bytes_of(&uniforms));
                }
                Some(Renderable::Points(points)) => {
                    let uniforms = PointsUniforms::new(&points.material, &entity.transform);
                    queue.write_buffer(&points.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
                }
                None => log::warn!("Entity {:?} has no renderable", key),
            }
        }
    }

    /// Record draw calls into a pass whose bind group 0 is already set
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &ScenePipelines) {
        if let Some(sky) = &self.sky {
            pass.set_pipeline(pipelines.skybox.pipeline());
            pass.set_bind_group(1, sky, &[]);
            pass.draw(0..3, 0..1);
        }

        for key in &self.draw_order {
            match self.renderables.get(key) {
                Some(Renderable::Mesh(mesh)) => {
                    pass.set_pipeline(pipelines.mesh.pipeline());
                    pass.set_bind_group(1, &mesh.material_bind_group, &[]);
                    pass.set_bind_group(2, &mesh.model_bind_group, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
                Some(Renderable::Points(points)) => {
                    let Some(pipeline) = pipelines.points.get(points.flags) else {
                        continue;
                    };
                    if points.count == 0 {
                        continue;
                    }
                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(1, &points.bind_group, &[]);
                    pass.set_vertex_buffer(0, points.instance_buffer.slice(..));
                    pass.draw(0..VERTICES_PER_POINT, 0..points.count);
                }
                None => {}
            }
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    pub fn has_sky(&self) -> bool {
        self.sky.is_some()
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }
}

/// Meshes before point clouds, each group in iteration order
fn draw_order<'a>(objects: impl Iterator<Item = (EntityKey, &'a Object)>) -> Vec<EntityKey> {
    let (mut meshes, points): (Vec<_>, Vec<_>) =
        objects.partition(|(_, object)| matches!(object, Object::Mesh { .. }));
    meshes.extend(points);
    meshes.into_iter().map(|(key, _)| key).collect()
}

/// Clear color for a background
pub fn clear_color(background: &Background) -> wgpu::Color {
    let [r, g, b, a] = background.clear_color();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthview_core::TextureRef;

    fn points() -> Object {
        Object::Points {
            positions: vec![[0.0, 0.0, 50.0]],
            material: PointsMaterial::default(),
        }
    }

    fn sphere() -> Object {
        Object::Mesh {
            geometry: SphereGeometry::default(),
            material: StandardMaterial::default(),
        }
    }

    #[test]
    fn test_points_drawn_after_meshes() {
        let mut world = World::new();
        let stars = world.add_entity(Entity::new(points()));
        let earth = world.add_entity(Entity::new(sphere()));
        let moon = world.add_entity(Entity::new(sphere()));

        let order = draw_order(world.iter().map(|(k, e)| (k, &e.object)));
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], stars);
        assert!(order[..2].contains(&earth));
        assert!(order[..2].contains(&moon));
    }

    #[test]
    fn test_clear_color_for_color_background() {
        let c = clear_color(&Background::Color([0.1, 0.2, 0.3, 1.0]));
        assert!((c.r - 0.1).abs() < 1e-6);
        assert!((c.b - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_clear_color_for_sky_is_black() {
        let c = clear_color(&Background::CubeMap {
            faces: std::array::from_fn(|i| TextureRef::srgb(format!("{}.jpg", i))),
        });
        assert_eq!(c, wgpu::Color::BLACK);
    }
}
