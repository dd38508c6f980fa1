//! The GPU context.
//!
//! Owns the surface, device and queue together with every resource shared by
//! all draws: the depth buffer, camera and light bind groups, the pipelines,
//! the material layout and the placeholder map.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::CameraResources,
    data_structures::texture::{self, Texture},
    gallery::Gallery,
    pipelines::{Pipelines, light::LightResources},
    resources,
};

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    /// Present when rendering multisampled.
    pub(crate) msaa_view: Option<wgpu::TextureView>,
    pub sample_count: u32,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub placeholder: Texture,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, gallery: &Gallery) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::debug!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let sample_count = texture::choose_sample_count(
            gallery.config().antialias,
            adapter.get_texture_format_features(surface_format).flags,
            adapter.get_texture_format_features(Texture::DEPTH_FORMAT).flags,
        );
        log::debug!("Rendering with {} sample(s) per pixel", sample_count);

        let camera = CameraResources::new(&device, gallery.camera(), gallery.projection());
        let light = LightResources::new(&device, gallery.scene());
        let material_layout = resources::texture::material_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &config,
            sample_count,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );
        let placeholder = Texture::create_placeholder(&device, &queue);
        let depth_texture = Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            sample_count,
            "depth_texture",
        );
        let msaa_view =
            (sample_count > 1).then(|| Texture::create_msaa_view(&device, &config, sample_count));

        Ok(Self {
            window,
            depth_texture,
            msaa_view,
            sample_count,
            surface,
            device,
            queue,
            config,
            camera,
            light,
            pipelines,
            material_layout,
            placeholder,
            clear_colour: gallery.config().clear_colour,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the surface and recreates the depth and MSAA targets.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            self.sample_count,
            "depth_texture",
        );
        if self.msaa_view.is_some() {
            self.msaa_view = Some(Texture::create_msaa_view(
                &self.device,
                &self.config,
                self.sample_count,
            ));
        }
    }
}
