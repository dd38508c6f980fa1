//! GPU mirror of the scene graph.
//!
//! [`GpuScene`] uploads every mesh node of a [`Scene`] once: shared geometry
//! buffers (nodes with an identical [`Shape`] reuse one mesh), a material bind
//! group per node and an instance buffer per node. Afterwards only the
//! instance buffers of dynamic nodes are rewritten, once per frame, and
//! materials are rebound when their texture arrives.
//!
//! Debug helpers are flattened into a single line list drawn with the helper
//! pipeline after the lit nodes.

use crate::{
    context::Context,
    data_structures::{
        geometry::{self, LineVertex},
        instance::InstanceRaw,
        model::{self, DrawModel},
        scene_graph::{Helper, NodeId, Scene, Shape, TextureRef, srgb},
        texture::Texture,
    },
    resources,
};
use wgpu::util::DeviceExt;

const GRID_CENTER_COLOR: u32 = 0x444444;
const GRID_COLOR: u32 = 0x888888;

struct GpuNode {
    mesh: usize,
    material: model::Material,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    dynamic: bool,
}

struct HelperLines {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

pub struct GpuScene {
    meshes: Vec<model::Mesh>,
    nodes: Vec<GpuNode>,
    helpers: Option<HelperLines>,
}

impl GpuScene {
    pub fn new(ctx: &Context, scene: &Scene) -> Self {
        let mut shapes: Vec<&Shape> = Vec::new();
        let mut meshes = Vec::new();
        let mut nodes = Vec::with_capacity(scene.nodes().len());

        for node in scene.nodes() {
            let mesh = match shapes.iter().position(|shape| **shape == node.shape) {
                Some(idx) => idx,
                None => {
                    shapes.push(&node.shape);
                    meshes.push(resources::mesh::upload(&ctx.device, &node.shape.geometry(), &node.name));
                    meshes.len() - 1
                }
            };

            let material = model::Material::new(
                &ctx.device,
                &ctx.material_layout,
                &node.name,
                &node.material,
                &ctx.placeholder,
            );

            let raw: Vec<InstanceRaw> = node.instances.iter().map(|instance| instance.to_raw()).collect();
            let instance_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Instance Buffer", node.name)),
                contents: bytemuck::cast_slice(&raw),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

            nodes.push(GpuNode {
                mesh,
                material,
                instance_buffer,
                instance_count: raw.len() as u32,
                dynamic: node.dynamic,
            });
        }

        let lines = helper_lines(scene);
        let helpers = (!lines.is_empty()).then(|| HelperLines {
            buffer: resources::mesh::upload_lines(&ctx.device, &lines, "helpers"),
            vertex_count: lines.len() as u32,
        });

        log::debug!(
            "Uploaded {} nodes sharing {} meshes, {} helper vertices",
            nodes.len(),
            meshes.len(),
            lines.len()
        );

        Self {
            meshes,
            nodes,
            helpers,
        }
    }

    /// Rewrites the instance buffers of dynamic nodes.
    pub fn sync(&self, queue: &wgpu::Queue, scene: &Scene) {
        for (gpu, node) in self.nodes.iter().zip(scene.nodes()) {
            if !gpu.dynamic {
                continue;
            }
            let raw: Vec<InstanceRaw> = node.instances.iter().map(|instance| instance.to_raw()).collect();
            queue.write_buffer(&gpu.instance_buffer, 0, bytemuck::cast_slice(&raw));
        }
    }

    /// Binds a decoded image as the map of `node`'s material.
    ///
    /// Only the first delivery per node is applied; returns whether this one
    /// was.
    pub fn apply_texture(
        &mut self,
        ctx: &Context,
        node: NodeId,
        image: &image::RgbaImage,
        map: &TextureRef,
    ) -> bool {
        let Some(gpu) = self.nodes.get_mut(node.0) else {
            log::warn!("Texture {} delivered for unknown node {:?}", map.asset, node);
            return false;
        };
        if gpu.material.has_map() {
            return false;
        }
        let texture = Texture::from_image(&ctx.device, &ctx.queue, image, &map.asset, map.wrap);
        gpu.material.apply_map(&ctx.device, &ctx.material_layout, &texture)
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, ctx: &Context) {
        render_pass.set_pipeline(&ctx.pipelines.standard);
        for node in &self.nodes {
            if node.instance_count == 0 {
                continue;
            }
            render_pass.set_vertex_buffer(1, node.instance_buffer.slice(..));
            render_pass.draw_mesh_instanced(
                &self.meshes[node.mesh],
                &node.material,
                0..node.instance_count,
                &ctx.camera.bind_group,
                &ctx.light.bind_group,
            );
        }

        if let Some(lines) = &self.helpers {
            render_pass.set_pipeline(&ctx.pipelines.helper);
            render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
            render_pass.set_vertex_buffer(0, lines.buffer.slice(..));
            render_pass.draw(0..lines.vertex_count, 0..1);
        }
    }
}

/// Flattens the scene's debug helpers into one line list.
pub fn helper_lines(scene: &Scene) -> Vec<LineVertex> {
    let mut lines = Vec::new();
    for helper in &scene.helpers {
        match *helper {
            Helper::Grid { size, divisions } => lines.extend(geometry::grid_lines(
                size,
                divisions,
                srgb(GRID_CENTER_COLOR),
                srgb(GRID_COLOR),
            )),
            Helper::Axes { size } => lines.extend(geometry::axes_lines(size)),
            Helper::AreaLight(idx) => match scene.area_lights.get(idx) {
                Some(light) => lines.extend(geometry::rect_outline(
                    light.position,
                    light.normal,
                    light.width,
                    light.height,
                    light.color,
                )),
                None => log::warn!("Helper refers to missing area light {idx}"),
            },
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder, config::GalleryConfig};

    #[test]
    fn shipped_scene_has_no_helper_lines() {
        let built = builder::build(&GalleryConfig::default().with_debug(false));
        assert!(helper_lines(&built.scene).is_empty());
    }

    #[test]
    fn debug_helpers_become_line_pairs() {
        let built = builder::build(&GalleryConfig::default().with_debug(true));
        let lines = helper_lines(&built.scene);
        // 51 lines per grid direction, 3 axes, 5 segments per light outline
        assert_eq!(lines.len(), 2 * (2 * 51 + 3 + 3 * 5));
        assert_eq!(lines.len() % 2, 0);
    }

    #[test]
    fn dangling_area_light_helper_is_skipped() {
        let mut scene = Scene::new();
        scene.helpers.push(Helper::AreaLight(3));
        assert!(helper_lines(&scene).is_empty());
    }
}
