//! Scene builder.
//!
//! Turns a [`GalleryConfig`] into a populated [`Scene`]: the hall (floor,
//! ceiling, side walls, back wall and optional trim), the three coloured area
//! lights, the torus knot and one painting plus spotlight per entry of the
//! painting table. Debug mode adds helpers and an ambient light.
//!
//! Building is meant to happen once per process, from [`crate::gallery::Gallery::new`].
//! Calling [`build`] again yields an unrelated second scene; nothing guards
//! against that.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::{
    config::{GalleryConfig, HallConfig, PaintingDescriptor},
    data_structures::{
        instance::Instance,
        scene_graph::{
            AmbientLight, AreaLight, Helper, Material, MeshNode, NodeId, Scene, Shape, SpotLight,
            TextureRef, srgb,
        },
    },
};

pub const KNOT_NAME: &str = "torus knot";

const SLAB_THICKNESS: f32 = 0.1;
const BACK_WALL_THICKNESS: f32 = 0.01;
const TRIM_SIZE: f32 = 1.0;
const WALL_COLOR: u32 = 0x3152a1;
const TRIM_COLOR: u32 = 0x704733;

const PAINTING_SIZE: f32 = 8.0;
const PAINTING_HEIGHT: f32 = 6.5;
/// Gap between a painting's centre plane and its wall.
const PAINTING_INSET: f32 = 0.1;
/// How far towards the hall centre a painting's spotlight hangs.
pub const SPOTLIGHT_OFFSET: f32 = 3.0;

/// The populated scene and the nodes the rest of the app refers to.
pub struct BuiltScene {
    pub scene: Scene,
    pub knot: NodeId,
    pub paintings: Vec<NodeId>,
}

pub fn knot_position() -> Vector3<f32> {
    Vector3::new(0.0, 5.0, 0.0)
}

pub fn build(config: &GalleryConfig) -> BuiltScene {
    let mut scene = Scene::new();

    add_area_lights(&mut scene);
    build_hall(&mut scene, &config.hall);

    let knot = scene.add(
        MeshNode::new(
            KNOT_NAME,
            Shape::TorusKnot {
                radius: 1.5,
                tube: 0.5,
                tubular_segments: 200,
                radial_segments: 16,
                p: 2,
                q: 3,
            },
            Material::standard(0xffffff, 0.1, 0.2),
        )
        .at(knot_position())
        .dynamic(),
    );

    let paintings = config
        .paintings
        .iter()
        .map(|painting| hang_painting(&mut scene, &config.hall, painting))
        .collect();

    if config.debug {
        add_debug_aids(&mut scene);
    }

    log::debug!(
        "Built gallery scene with {} nodes, {} area lights and {} spotlights",
        scene.nodes().len(),
        scene.area_lights.len(),
        scene.spot_lights.len()
    );

    BuiltScene {
        scene,
        knot,
        paintings,
    }
}

fn add_area_lights(scene: &mut Scene) {
    for (color, x) in [(0xff0000, -5.0), (0x00ff00, 0.0), (0x0000ff, 5.0)] {
        scene.area_lights.push(AreaLight {
            color: srgb(color),
            intensity: 5.0,
            width: 4.0,
            height: 10.0,
            position: Vector3::new(x, 5.0, 5.0),
            normal: -Vector3::unit_z(),
        });
    }
}

fn build_hall(scene: &mut Scene, hall: &HallConfig) {
    let center_z = hall.center_z();
    let slab = Shape::cuboid(hall.width, SLAB_THICKNESS, hall.depth);

    let mut floor = Material::standard(0xffffff, 0.5, 0.0);
    if let Some(texture) = &hall.floor_texture {
        floor = floor.with_map(TextureRef::new(texture).repeat().rotated(FRAC_PI_2));
    }
    scene.add(MeshNode::new("floor", slab.clone(), floor).at(Vector3::new(0.0, 0.0, center_z)));

    let mut ceiling = Material::standard(0xffffff, 1.0, 0.0);
    if let Some(texture) = &hall.ceiling_texture {
        ceiling = ceiling.with_map(TextureRef::new(texture).repeat());
    }
    scene.add(MeshNode::new("ceiling", slab, ceiling).at(Vector3::new(0.0, hall.height, center_z)));

    let wall_material = Material::standard(WALL_COLOR, 0.5, 0.0);
    let wall_x = hall.width / 2.0;
    let mut walls = MeshNode::new(
        "side walls",
        Shape::cuboid(SLAB_THICKNESS, hall.height, hall.depth),
        wall_material.clone(),
    );
    for x in [-wall_x, wall_x] {
        walls = walls.at(Vector3::new(x, hall.height / 2.0, center_z));
    }

    if hall.wall_trim {
        let mut trim = MeshNode::new(
            "wall trim",
            Shape::cuboid(TRIM_SIZE, TRIM_SIZE, hall.depth),
            Material::standard(TRIM_COLOR, 0.5, 0.0),
        );
        trim.instances = walls
            .instances
            .iter()
            .map(|wall| Instance::from(Vector3::new(wall.position.x, TRIM_SIZE / 2.0, wall.position.z)))
            .collect();
        scene.add(walls);
        scene.add(trim);
    } else {
        scene.add(walls);
    }

    scene.add(
        MeshNode::new(
            "back wall",
            Shape::cuboid(hall.width, hall.height, BACK_WALL_THICKNESS),
            wall_material,
        )
        .at(Vector3::new(
            0.0,
            hall.height / 2.0,
            HallConfig::FRONT + 0.05,
        )),
    );
}

/// Emits the painting mesh and its spotlight for one table entry.
fn hang_painting(scene: &mut Scene, hall: &HallConfig, painting: &PaintingDescriptor) -> NodeId {
    let x = painting.side.sign() * (hall.width / 2.0 - PAINTING_INSET);
    let node = scene.add(
        MeshNode::new(
            painting.texture.clone(),
            Shape::cuboid(SLAB_THICKNESS, PAINTING_SIZE, PAINTING_SIZE),
            Material::standard(0xffffff, 0.7, 0.0).with_map(TextureRef::new(&painting.texture)),
        )
        .at(Vector3::new(x, PAINTING_HEIGHT, painting.depth)),
    );

    let light_x = x + if x < 0.0 { SPOTLIGHT_OFFSET } else { -SPOTLIGHT_OFFSET };
    scene.spot_lights.push(SpotLight {
        color: [1.0, 1.0, 1.0],
        intensity: 0.07,
        distance: 100.0,
        angle: 1.0,
        penumbra: 1.0,
        decay: 10.0,
        position: Vector3::new(light_x, hall.height, painting.depth),
        target: node,
    });
    node
}

fn add_debug_aids(scene: &mut Scene) {
    scene.helpers.push(Helper::Grid {
        size: 200.0,
        divisions: 50,
    });
    scene.helpers.push(Helper::Axes { size: 10.0 });
    for idx in 0..scene.area_lights.len() {
        scene.helpers.push(Helper::AreaLight(idx));
    }
    scene.ambient = Some(AmbientLight {
        color: [1.0, 1.0, 1.0],
        intensity: 0.5,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_scene_has_no_debug_aids() {
        let built = build(&GalleryConfig::default().with_debug(false));
        assert!(built.scene.helpers.is_empty());
        assert!(built.scene.ambient.is_none());
    }

    #[test]
    fn debug_scene_adds_helpers_for_each_area_light() {
        let built = build(&GalleryConfig::default().with_debug(true));
        let outlines = built
            .scene
            .helpers
            .iter()
            .filter(|helper| matches!(helper, Helper::AreaLight(_)))
            .count();
        assert_eq!(outlines, 3);
        assert_eq!(built.scene.helpers.len(), 5);
        assert!(built.scene.ambient.is_some());
    }

    #[test]
    fn trim_follows_walls() {
        let built = build(&GalleryConfig::default());
        let scene = &built.scene;
        let walls = scene.node(scene.find("side walls").unwrap());
        let trim = scene.node(scene.find("wall trim").unwrap());
        assert_eq!(walls.instances.len(), 2);
        for (wall, strip) in walls.instances.iter().zip(&trim.instances) {
            assert_eq!(wall.position.x, strip.position.x);
            assert_eq!(wall.position.z, strip.position.z);
            assert_eq!(strip.position.y, 0.5);
        }
    }

    #[test]
    fn bare_hall_has_no_trim_or_maps() {
        let hall = HallConfig {
            depth: 2000.0,
            floor_texture: None,
            ceiling_texture: None,
            wall_trim: false,
            ..Default::default()
        };
        let built = build(&GalleryConfig::default().with_hall(hall));
        assert!(built.scene.find("wall trim").is_none());
        let floor = built.scene.node(built.scene.find("floor").unwrap());
        assert!(floor.material.map.is_none());
        assert_eq!(floor.instances[0].position.z, -995.0);
        // only the five paintings still need textures
        assert_eq!(built.scene.texture_requests().count(), 5);
    }

    #[test]
    fn floor_map_is_repeated_and_rotated() {
        let built = build(&GalleryConfig::default());
        let floor = built.scene.node(built.scene.find("floor").unwrap());
        let map = floor.material.map.as_ref().unwrap();
        assert_eq!(map.asset, "textures/floor.jpg");
        assert_eq!(map.rotation, FRAC_PI_2);
    }

    #[test]
    fn knot_is_the_only_dynamic_node() {
        let built = build(&GalleryConfig::default());
        let dynamic: Vec<_> = built.scene.nodes().iter().filter(|node| node.dynamic).collect();
        assert_eq!(dynamic.len(), 1);
        assert_eq!(dynamic[0].name, KNOT_NAME);
        assert_eq!(built.scene.position_of(built.knot), knot_position());
    }
}
