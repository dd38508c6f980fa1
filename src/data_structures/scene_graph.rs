//! The CPU-side scene graph.
//!
//! A [`Scene`] is the root every mesh node, light and debug helper is added
//! to. It is a flat, append-only collection: nodes are addressed by the
//! [`NodeId`] returned when they were added and live as long as the scene.
//! Nothing here touches the GPU, [`crate::render::GpuScene`] mirrors it.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::{
    geometry::{self, Geometry},
    instance::Instance,
};

/// Index of a mesh node inside its [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Procedural shape of a mesh node.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl Shape {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Box {
            width,
            height,
            depth,
        }
    }

    pub fn geometry(&self) -> Geometry {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => geometry::cuboid(width, height, depth),
            Shape::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => geometry::torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// An image asset bound to a material, with the sampling settings applied
/// once the image has been decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRef {
    pub asset: String,
    pub wrap: Wrap,
    /// UV rotation in radians around the texture origin.
    pub rotation: f32,
}

impl TextureRef {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            wrap: Wrap::default(),
            rotation: 0.0,
        }
    }

    pub fn repeat(mut self) -> Self {
        self.wrap = Wrap::Repeat;
        self
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Physically based surface description: linear colour, roughness,
/// metalness and an optional colour map.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub map: Option<TextureRef>,
}

impl Material {
    pub fn standard(color: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: srgb(color),
            roughness,
            metalness,
            map: None,
        }
    }

    pub fn with_map(mut self, map: TextureRef) -> Self {
        self.map = Some(map);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(0xffffff, 1.0, 0.0)
    }
}

/// Converts a `0xRRGGBB` sRGB colour into linear components.
pub fn srgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

pub struct MeshNode {
    pub name: String,
    pub shape: Shape,
    pub material: Material,
    pub instances: Vec<Instance>,
    /// Dynamic nodes get their instance buffer rewritten every frame.
    pub dynamic: bool,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, shape: Shape, material: Material) -> Self {
        Self {
            name: name.into(),
            shape,
            material,
            instances: Vec::new(),
            dynamic: false,
        }
    }

    pub fn at(mut self, position: Vector3<f32>) -> Self {
        self.instances.push(position.into());
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// A one-sided rectangular emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
    pub position: Vector3<f32>,
    /// Direction the emitting side faces.
    pub normal: Vector3<f32>,
}

/// A cone light aimed at a mesh node.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Range after which the light contributes nothing; zero means unbounded.
    pub distance: f32,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out towards its edge.
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vector3<f32>,
    pub target: NodeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Line gizmos drawn only in debug mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Helper {
    Grid { size: f32, divisions: u32 },
    Axes { size: f32 },
    /// Outline of the area light with this index.
    AreaLight(usize),
}

#[derive(Default)]
pub struct Scene {
    meshes: Vec<MeshNode>,
    pub area_lights: Vec<AreaLight>,
    pub spot_lights: Vec<SpotLight>,
    pub ambient: Option<AmbientLight>,
    pub helpers: Vec<Helper>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: MeshNode) -> NodeId {
        self.meshes.push(node);
        NodeId(self.meshes.len() - 1)
    }

    pub fn nodes(&self) -> &[MeshNode] {
        &self.meshes
    }

    pub fn node(&self, id: NodeId) -> &MeshNode {
        &self.meshes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MeshNode {
        &mut self.meshes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.meshes.iter().position(|node| node.name == name).map(NodeId)
    }

    /// World position of a node's first instance.
    pub fn position_of(&self, id: NodeId) -> Vector3<f32> {
        self.node(id)
            .instances
            .first()
            .map_or(Vector3::new(0.0, 0.0, 0.0), |instance| instance.position)
    }

    /// Unit vector from the spotlight towards its target.
    pub fn spot_direction(&self, light: &SpotLight) -> Vector3<f32> {
        let towards = self.position_of(light.target) - light.position;
        if towards.magnitude2() == 0.0 {
            -Vector3::unit_y()
        } else {
            towards.normalize()
        }
    }

    pub fn spot_lights_targeting(&self, id: NodeId) -> impl Iterator<Item = &SpotLight> {
        self.spot_lights.iter().filter(move |light| light.target == id)
    }

    /// Every material map that still has to be fetched, with its node.
    pub fn texture_requests(&self) -> impl Iterator<Item = (NodeId, &TextureRef)> {
        self.meshes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.material.map.as_ref().map(|map| (NodeId(idx), map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_converts_to_linear() {
        assert!(srgb(0xffffff).iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(srgb(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = srgb(0x3152a1);
        assert!(r < g && g < b);
        assert!((b - 0.3564).abs() < 1e-3);
    }

    #[test]
    fn spot_direction_points_at_target() {
        let mut scene = Scene::new();
        let target = scene.add(
            MeshNode::new("painting", Shape::cuboid(0.1, 8.0, 8.0), Material::default())
                .at(Vector3::new(9.9, 6.5, -10.0)),
        );
        let light = SpotLight {
            color: [1.0; 3],
            intensity: 1.0,
            distance: 0.0,
            angle: 1.0,
            penumbra: 0.0,
            decay: 1.0,
            position: Vector3::new(6.9, 12.0, -10.0),
            target,
        };
        let direction = scene.spot_direction(&light);
        assert!(direction.x > 0.0 && direction.y < 0.0);
        assert!((direction.z - 0.0).abs() < 1e-6);
        assert!((direction.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn texture_requests_skip_plain_materials() {
        let mut scene = Scene::new();
        scene.add(MeshNode::new("wall", Shape::cuboid(1.0, 1.0, 1.0), Material::default()));
        let floor = scene.add(MeshNode::new(
            "floor",
            Shape::cuboid(1.0, 1.0, 1.0),
            Material::default().with_map(TextureRef::new("textures/floor.jpg").repeat()),
        ));
        let requests: Vec<_> = scene.texture_requests().collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, floor);
        assert_eq!(requests[0].1.wrap, Wrap::Repeat);
    }
}
