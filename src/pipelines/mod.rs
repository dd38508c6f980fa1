//! Render pipelines.
//!
//! - `basic`: the shared pipeline constructor and the lit standard pipeline
//! - `helper`: unlit line lists for the debug helpers
//! - `light`: the light uniform and its bind group

pub mod basic;
pub mod helper;
pub mod light;

pub struct Pipelines {
    pub standard: wgpu::RenderPipeline,
    pub helper: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        material_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            standard: basic::mk_standard_pipeline(
                device,
                config,
                sample_count,
                material_bind_group_layout,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            helper: helper::mk_helper_pipeline(device, config, sample_count, camera_bind_group_layout),
        }
    }
}
