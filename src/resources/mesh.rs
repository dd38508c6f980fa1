use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::{Geometry, LineVertex},
    model,
};

/// Uploads generated geometry into vertex and index buffers.
pub fn upload(device: &wgpu::Device, geometry: &Geometry, name: &str) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Vertex Buffer")),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Index Buffer")),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: geometry.indices.len() as u32,
    }
}

pub fn upload_lines(device: &wgpu::Device, lines: &[LineVertex], name: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Line Buffer")),
        contents: bytemuck::cast_slice(lines),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
