//! GPU-side meshes and materials.
//!
//! A [`Mesh`] owns the vertex and index buffers of one uploaded
//! [`Geometry`](crate::data_structures::geometry::Geometry). A [`Material`]
//! owns the uniform buffer and bind group combining a surface description with
//! its (possibly still loading) texture. [`DrawModel`] extends the render pass
//! with the one draw call every gallery node needs.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::data_structures::{scene_graph, texture::Texture};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

/**
 * The raw material is the uniform block read by the fragment shader.
 *
 * `params` packs roughness, metalness and the UV rotation of the map; the last
 * lane is padding to keep the 16 byte alignment uniforms require.
 */
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn new(material: &scene_graph::Material) -> Self {
        let [r, g, b] = material.color;
        let rotation = material.map.as_ref().map_or(0.0, |map| map.rotation);
        Self {
            color: [r, g, b, 1.0],
            params: [material.roughness, material.metalness, rotation, 0.0],
        }
    }
}

/// A material bound to the GPU.
///
/// Starts out sampling a white placeholder; [`Material::apply_map`] swaps in
/// the decoded texture once, after which further deliveries are ignored.
pub struct Material {
    pub name: String,
    pub uniform: MaterialUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    map_applied: bool,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        material: &scene_graph::Material,
        placeholder: &Texture,
    ) -> Self {
        let uniform = MaterialUniform::new(material);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Material Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = mk_bind_group(device, layout, name, placeholder, &buffer);
        Self {
            name: name.to_string(),
            uniform,
            buffer,
            bind_group,
            map_applied: false,
        }
    }

    pub fn has_map(&self) -> bool {
        self.map_applied
    }

    /// Rebinds the material to `texture`. Returns `false` when a map had
    /// already been applied, in which case nothing changes.
    pub fn apply_map(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &Texture,
    ) -> bool {
        if self.map_applied {
            return false;
        }
        self.bind_group = mk_bind_group(device, layout, &self.name, texture, &self.buffer);
        self.map_applied = true;
        true
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    name: &str,
    texture: &Texture,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: buffer.as_entire_binding(),
            },
        ],
        label: Some(name),
    })
}

pub trait DrawModel {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}
