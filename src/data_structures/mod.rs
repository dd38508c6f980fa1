//! Gallery data structures: geometry, scene graph, instances, GPU models and textures.
//!
//! - `geometry` generates boxes, the torus knot and helper line lists
//! - `scene_graph` holds the CPU scene: nodes, materials, lights and helpers
//! - `instance` holds per-instance transforms and their GPU layout
//! - `model` contains uploaded meshes, materials and the draw extension
//! - `texture` wraps GPU textures, the placeholder map and the depth buffer

pub mod geometry;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
