//! Application event loop.
//!
//! This module wires the [`Gallery`] into winit. It owns the window, the GPU
//! [`Context`] and the [`GpuScene`], and forwards the outside world to the
//! gallery: resizes, scroll offsets, redraw ticks and, in debug builds, mouse
//! input for the orbit rig.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and builds the [`AppState`] (blocking on
//!    the tokio runtime natively, through `spawn_local` in the browser)
//! 2. Once initialized the surface is sized, the startup scroll offset is
//!    applied and every texture of the scene is requested
//! 3. Each `RedrawRequested` advances the gallery to the elapsed time, uploads
//!    the camera and dynamic instances, renders one pass and requests the
//!    next frame
//! 4. Decoded textures come back as [`FlowEvent::TextureLoaded`] and are
//!    bound to their material once

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::GalleryConfig,
    context::Context,
    data_structures::scene_graph::{NodeId, TextureRef},
    gallery::Gallery,
    render::GpuScene,
    resources,
    stats::StatsSample,
};

#[cfg(not(target_arch = "wasm32"))]
use crate::scroll::PageScroll;
#[cfg(target_arch = "wasm32")]
use crate::dom;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Everything that exists once a window and a GPU are available.
pub(crate) struct AppState {
    pub(crate) ctx: Context,
    gallery: Gallery,
    scene: GpuScene,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: GalleryConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let gallery = Gallery::new(config, size.width.max(1), size.height.max(1));
        let ctx = Context::new(window, &gallery).await?;
        let scene = GpuScene::new(&ctx, gallery.scene());
        Ok(Self {
            ctx,
            gallery,
            scene,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gallery.resize(width, height) {
            self.ctx.resize_surface(width, height);
            self.is_surface_configured = true;
        }
    }

    fn scroll(&mut self, top: f64) {
        self.gallery.scroll(top);
    }

    fn update(&mut self, time_ms: f64) -> Option<StatsSample> {
        let sample = self.gallery.frame(time_ms);
        self.ctx
            .camera
            .write(&self.ctx.queue, self.gallery.camera(), self.gallery.projection());
        self.scene.sync(&self.ctx.queue, self.gallery.scene());
        sample
    }

    fn texture_loaded(&mut self, node: NodeId, map: TextureRef, result: anyhow::Result<image::RgbaImage>) {
        match result {
            Ok(image) => {
                if self.scene.apply_texture(&self.ctx, node, &image, &map) {
                    log::debug!("Applied texture {}", map.asset);
                }
            }
            // The material keeps sampling the placeholder.
            Err(e) if self.gallery.is_debug() => log::warn!("Texture {} unavailable: {:#}", map.asset, e),
            Err(e) => log::debug!("Texture {} unavailable: {:#}", map.asset, e),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        // Multisampled passes draw into the MSAA target and resolve into the frame.
        let color_attachment = match &self.ctx.msaa_view {
            Some(msaa_view) => wgpu::RenderPassColorAttachment {
                view: msaa_view,
                resolve_target: Some(&view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                    store: wgpu::StoreOp::Discard,
                },
            },
            None => wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
            },
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(color_attachment)],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.scene.draw(&mut render_pass, &self.ctx);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum FlowEvent {
    /// The browser finished building the [`AppState`] on another turn.
    #[allow(dead_code)]
    Initialized(AppState),
    /// New top offset of the document body.
    #[allow(dead_code)]
    Scroll(f64),
    TextureLoaded {
        node: NodeId,
        map: TextureRef,
        result: anyhow::Result<image::RgbaImage>,
    },
}

struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    // Taken by `resumed`.
    config: Option<GalleryConfig>,
    state: Option<AppState>,
    start: Instant,
    #[cfg(not(target_arch = "wasm32"))]
    page: PageScroll,
    #[cfg(target_arch = "wasm32")]
    stats_panel: Option<dom::StatsPanel>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: GalleryConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: Some(config),
            state: None,
            start: Instant::now(),
            #[cfg(not(target_arch = "wasm32"))]
            page: PageScroll::new(),
            #[cfg(target_arch = "wasm32")]
            stats_panel: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    /// Runs once the GPU state exists, on either platform.
    fn initialized(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);

        #[cfg(not(target_arch = "wasm32"))]
        let top = self.page.top();
        #[cfg(target_arch = "wasm32")]
        let top = dom::body_top().unwrap_or_else(|e| {
            log::warn!("{:#}", e);
            0.0
        });
        state.scroll(top);

        self.request_textures(&state);
        state.ctx.window.request_redraw();
        self.start = Instant::now();
        self.state = Some(state);
    }

    /// Starts one fetch per material map; results arrive as user events.
    fn request_textures(&self, state: &AppState) {
        for (node, map) in state.gallery.scene().texture_requests() {
            let map = map.clone();
            let proxy = self.proxy.clone();
            let load = async move {
                let result = resources::texture::load_image(&map.asset).await;
                if proxy
                    .send_event(FlowEvent::TextureLoaded { node, map, result })
                    .is_err()
                {
                    log::debug!("Event loop closed before a texture arrived");
                }
            };

            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(load);
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(load);
        }
    }

    fn report(&self, sample: StatsSample) {
        #[cfg(not(target_arch = "wasm32"))]
        log::info!("{:.1} fps ({:.2} ms/frame)", sample.fps, sample.frame_ms);
        #[cfg(target_arch = "wasm32")]
        if let Some(panel) = &self.stats_panel {
            panel.show(sample);
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Hallway Gallery");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = dom::canvas(&config.canvas_id).unwrap_throw();
            window_attributes = window_attributes.with_canvas(Some(canvas));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::anyhow!("creating the window: {e}")),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window, config)) {
                Ok(state) => self.initialized(state),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            if let Some(link) = &config.document {
                dom::link_document(link).unwrap_throw();
            }
            if config.debug {
                dom::remove_element(&config.overlay_id).unwrap_throw();
                self.stats_panel = Some(dom::StatsPanel::new().unwrap_throw());
            }
            dom::listen_scroll(self.proxy.clone()).unwrap_throw();
            dom::listen_resize(window.clone()).unwrap_throw();

            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = AppState::new(window, config).await.unwrap_throw();
                assert!(proxy.send_event(FlowEvent::Initialized(state)).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(state) => self.initialized(state),
            FlowEvent::Scroll(top) => {
                if let Some(state) = &mut self.state {
                    state.scroll(top);
                }
            }
            FlowEvent::TextureLoaded { node, map, result } => {
                if let Some(state) = &mut self.state {
                    state.texture_loaded(node, map, result);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.gallery.window_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                let top = self.page.wheel(delta);
                state.scroll(top);
            }
            WindowEvent::RedrawRequested => {
                let time_ms = self.start.elapsed().as_secs_f64() * 1000.0;
                let sample = state.update(time_ms);

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }

                if let Some(sample) = sample {
                    self.report(sample);
                }
            }
            _ => {}
        }
    }
}

/// Opens the gallery and runs it until the window closes.
pub fn run(config: GalleryConfig) -> anyhow::Result<()> {
    let level = if config.debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };

    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or(level.as_str());
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(level).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
