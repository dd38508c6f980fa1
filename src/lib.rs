//! hallway-gallery
//!
//! A scroll-driven 3D art gallery: a hallway lined with five lit paintings,
//! three coloured area lights at the entrance and a rotating torus knot,
//! rendered with wgpu natively and in the browser on WebGL2. Scrolling the
//! page walks the camera down the hall.
//!
//! High-level modules
//! - `config`: hall dimensions, the painting table and the debug switch
//! - `builder`: turns a configuration into a populated scene
//! - `camera`: camera, projection and the camera uniform
//! - `rig`: per-frame camera movement (sway when shipped, orbit in debug)
//! - `scroll`: scroll offset to camera depth
//! - `gallery`: the application context the event handlers mutate
//! - `data_structures`: geometry, scene graph, instances, GPU meshes and textures
//! - `pipelines`: the lit and helper pipelines and the light uniform
//! - `resources`: asset fetching and buffer uploads
//! - `render`: the GPU mirror of the scene and its draw routine
//! - `context`: surface, device, queue and shared GPU resources
//! - `flow`: the winit event loop
//!

pub mod builder;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
#[cfg(target_arch = "wasm32")]
mod dom;
pub mod flow;
pub mod gallery;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod rig;
pub mod scroll;
pub mod stats;

pub use config::{GalleryConfig, HallConfig, PaintingDescriptor, WallSide};
pub use gallery::Gallery;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    flow::run(GalleryConfig::default()).unwrap_throw();
}
