//! The light uniform shared by every lit draw.
//!
//! Lights never move after the scene is built, so the uniform is packed once
//! from the [`Scene`] and written to the GPU at startup.

use wgpu::util::DeviceExt;

use crate::data_structures::scene_graph::{AreaLight, Scene, SpotLight};

pub const MAX_AREA_LIGHTS: usize = 4;
pub const MAX_SPOT_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AreaLightRaw {
    position: [f32; 4],
    normal: [f32; 4],
    color: [f32; 4],
    size: [f32; 4],
}

impl AreaLightRaw {
    pub fn new(light: &AreaLight) -> Self {
        let [r, g, b] = light.color;
        Self {
            position: light.position.extend(1.0).into(),
            normal: light.normal.extend(0.0).into(),
            color: [r, g, b, light.intensity],
            size: [light.width, light.height, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    position: [f32; 4],
    /// Direction towards the target, cosine of the outer cone in `w`.
    direction: [f32; 4],
    color: [f32; 4],
    /// Distance, decay and the cosine of the inner cone.
    params: [f32; 4],
}

impl SpotLightRaw {
    pub fn new(scene: &Scene, light: &SpotLight) -> Self {
        let direction = scene.spot_direction(light);
        let [r, g, b] = light.color;
        let (cos_outer, cos_inner) = cone_cosines(light.angle, light.penumbra);
        Self {
            position: light.position.extend(1.0).into(),
            direction: [direction.x, direction.y, direction.z, cos_outer],
            color: [r, g, b, light.intensity],
            params: [light.distance, light.decay, cos_inner, 0.0],
        }
    }

    pub fn direction(&self) -> [f32; 3] {
        [self.direction[0], self.direction[1], self.direction[2]]
    }
}

/// Cosines of the outer and inner cone. The penumbra is the fraction of the
/// cone angle over which the light fades out.
pub fn cone_cosines(angle: f32, penumbra: f32) -> (f32, f32) {
    let angle = angle.abs();
    let penumbra = penumbra.clamp(0.0, 1.0);
    (angle.cos(), (angle * (1.0 - penumbra)).cos())
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 4],
    counts: [u32; 4],
    area: [AreaLightRaw; MAX_AREA_LIGHTS],
    spot: [SpotLightRaw; MAX_SPOT_LIGHTS],
}

impl LightUniform {
    /// Packs the scene's lights. Lights beyond the shader's capacity are
    /// dropped with a warning.
    pub fn new(scene: &Scene) -> Self {
        let mut uniform = Self {
            ambient: scene
                .ambient
                .as_ref()
                .map_or([0.0; 4], |ambient| {
                    let [r, g, b] = ambient.color;
                    [r, g, b, ambient.intensity]
                }),
            counts: [0; 4],
            area: [AreaLightRaw::default(); MAX_AREA_LIGHTS],
            spot: [SpotLightRaw::default(); MAX_SPOT_LIGHTS],
        };

        if scene.area_lights.len() > MAX_AREA_LIGHTS {
            log::warn!(
                "Scene has {} area lights, only the first {} are rendered",
                scene.area_lights.len(),
                MAX_AREA_LIGHTS
            );
        }
        for (slot, light) in uniform.area.iter_mut().zip(&scene.area_lights) {
            *slot = AreaLightRaw::new(light);
            uniform.counts[0] += 1;
        }

        if scene.spot_lights.len() > MAX_SPOT_LIGHTS {
            log::warn!(
                "Scene has {} spotlights, only the first {} are rendered",
                scene.spot_lights.len(),
                MAX_SPOT_LIGHTS
            );
        }
        for (slot, light) in uniform.spot.iter_mut().zip(&scene.spot_lights) {
            *slot = SpotLightRaw::new(scene, light);
            uniform.counts[1] += 1;
        }
        uniform
    }

    pub fn area_count(&self) -> u32 {
        self.counts[0]
    }

    pub fn spot_count(&self) -> u32 {
        self.counts[1]
    }

    pub fn spot(&self, idx: usize) -> &SpotLightRaw {
        &self.spot[idx]
    }
}

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let uniform = LightUniform::new(scene);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder, config::GalleryConfig};

    #[test]
    fn uniform_layout_matches_shader() {
        // ambient + counts + 4 area lights + 8 spotlights, 64 bytes each
        assert_eq!(std::mem::size_of::<LightUniform>(), 32 + 12 * 64);
    }

    #[test]
    fn packs_gallery_lights() {
        let built = builder::build(&GalleryConfig::default().with_debug(false));
        let uniform = LightUniform::new(&built.scene);
        assert_eq!(uniform.area_count(), 3);
        assert_eq!(uniform.spot_count(), 5);
        assert_eq!(uniform.ambient, [0.0; 4]);
        for idx in 0..5 {
            let [x, y, z] = uniform.spot(idx).direction();
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
            assert!(y < 0.0);
        }
    }

    #[test]
    fn full_penumbra_fades_across_whole_cone() {
        let (outer, inner) = cone_cosines(1.0, 1.0);
        assert_eq!(outer, 1.0f32.cos());
        assert_eq!(inner, 1.0);
        let (outer, inner) = cone_cosines(-1.0, 0.0);
        assert_eq!(outer, inner);
    }
}
