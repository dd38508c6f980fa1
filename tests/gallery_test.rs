use assert_approx_eq::assert_approx_eq;
use cgmath::{EuclideanSpace, Point3, Quaternion, Rad, Rotation3};
use hallway_gallery::{builder, config::HallConfig, scroll};

use crate::common::test_utils::{HEIGHT, WIDTH, assert_aims_at, debug_gallery, shipped_gallery};

mod common;

#[test]
fn startup_puts_camera_at_the_entrance() {
    let gallery = shipped_gallery();
    assert_eq!(gallery.camera().position.z, -15.0);
    assert_eq!(gallery.viewport(), (WIDTH, HEIGHT));
    assert_approx_eq!(gallery.projection().aspect(), WIDTH as f32 / HEIGHT as f32);
}

#[test]
fn scrolling_500_pixels_walks_five_units() {
    let mut gallery = shipped_gallery();
    gallery.scroll(-500.0);
    assert_approx_eq!(gallery.camera().position.z, -20.0);
}

#[test]
fn scroll_depth_is_linear_for_every_offset() {
    let mut gallery = shipped_gallery();
    for top in [0.0, -1.0, -250.5, -1234.0, -4500.0, -9999.0] {
        gallery.scroll(top);
        assert_approx_eq!(gallery.camera().position.z, (top * 0.01 - 15.0) as f32, 1e-4);
    }
    // startup and event invocations share the mapping
    gallery.scroll(0.0);
    assert_eq!(gallery.camera().position.z, scroll::scroll_depth(0.0));
}

#[test]
fn camera_can_walk_past_the_far_wall() {
    let mut gallery = shipped_gallery();
    gallery.scroll(-10_000.0);
    let z = gallery.camera().position.z;
    assert_approx_eq!(z, -115.0, 1e-4);
    assert!(z < HallConfig::default().far_end());
}

#[test]
fn knot_angle_is_elapsed_seconds() {
    let mut gallery = shipped_gallery();
    for time_ms in [0.0, 16.7, 1000.0, 6283.2, 100_000.0] {
        gallery.frame(time_ms);
        let expected = Rad((time_ms / 1000.0) as f32);
        assert_eq!(gallery.knot_angle(), expected);
        assert_eq!(gallery.knot_rotation(), Quaternion::from_angle_y(expected));
    }
}

#[test]
fn knot_angle_keeps_full_turns() {
    let four_pi_ms = 4.0 * std::f64::consts::PI * 1000.0;
    let mut first = shipped_gallery();
    first.frame(1000.0);
    let mut later = shipped_gallery();
    later.frame(1000.0 + four_pi_ms);

    assert_ne!(first.knot_angle(), later.knot_angle());
    assert_approx_eq!(later.knot_angle().0 - first.knot_angle().0, (4.0 * std::f64::consts::PI) as f32, 1e-4);
}

#[test]
fn sway_depends_only_on_time() {
    let mut warmed = shipped_gallery();
    for frame in 0..120 {
        warmed.frame(frame as f64 * 16.0);
    }
    warmed.frame(4321.0);

    let mut fresh = shipped_gallery();
    fresh.frame(4321.0);

    assert_eq!(warmed.camera(), fresh.camera());
    assert_eq!(fresh.camera().position.x, (4.321f64).sin() as f32);
}

#[test]
fn frames_keep_the_scroll_depth() {
    let mut gallery = shipped_gallery();
    gallery.scroll(-800.0);
    gallery.frame(2500.0);
    assert_approx_eq!(gallery.camera().position.z, -23.0, 1e-5);
    assert_eq!(gallery.camera().position.y, 5.0);
}

#[test]
fn resize_updates_aspect_and_viewport() {
    let mut gallery = shipped_gallery();
    assert!(gallery.resize(1920, 1080));
    assert_eq!(gallery.viewport(), (1920, 1080));
    assert_approx_eq!(gallery.projection().aspect(), 1920.0 / 1080.0);

    assert!(gallery.resize(300, 900));
    assert_approx_eq!(gallery.projection().aspect(), 1.0 / 3.0);
}

#[test]
fn every_painting_has_one_spotlight() {
    let gallery = shipped_gallery();
    let scene = gallery.scene();
    assert_eq!(gallery.paintings().len(), 5);
    assert_eq!(scene.spot_lights.len(), 5);

    for &painting in gallery.paintings() {
        let lights: Vec<_> = scene.spot_lights_targeting(painting).collect();
        assert_eq!(lights.len(), 1);

        let x = scene.position_of(painting).x;
        let offset = lights[0].position.x - x;
        if x < 0.0 {
            assert_approx_eq!(offset, builder::SPOTLIGHT_OFFSET);
        } else {
            assert_approx_eq!(offset, -builder::SPOTLIGHT_OFFSET);
        }
        assert_eq!(lights[0].position.z, scene.position_of(painting).z);
    }
}

#[test]
fn paintings_hang_inside_the_walls() {
    let gallery = shipped_gallery();
    let scene = gallery.scene();
    let depths: Vec<f32> = gallery
        .paintings()
        .iter()
        .map(|&painting| scene.position_of(painting).z)
        .collect();
    assert_eq!(depths, vec![-10.0, -20.0, -30.0, -40.0, -50.0]);
    for &painting in gallery.paintings() {
        assert_approx_eq!(scene.position_of(painting).x.abs(), 9.9);
    }
}

#[test]
fn all_maps_are_requested() {
    let gallery = shipped_gallery();
    // five paintings, the floor and the ceiling
    assert_eq!(gallery.scene().texture_requests().count(), 7);
}

#[test]
fn debug_gallery_orbits_the_knot() {
    let mut gallery = debug_gallery();
    assert_eq!(gallery.rig_name(), "orbit");
    assert!(!gallery.scene().helpers.is_empty());

    gallery.frame(1000.0);
    let knot = Point3::from_vec(gallery.scene().position_of(gallery.knot()));
    let camera = gallery.camera();
    assert_aims_at(camera.position, camera.forward(), knot);
}

#[test]
fn shipped_gallery_keeps_its_heading() {
    let mut gallery = shipped_gallery();
    let before = gallery.camera().clone();
    gallery.frame(1570.0);
    assert_eq!(gallery.camera().yaw, before.yaw);
    assert_eq!(gallery.camera().pitch, before.pitch);
}

#[test]
fn debug_gallery_still_walks_on_scroll() {
    let mut gallery = debug_gallery();
    gallery.frame(0.0);
    gallery.scroll(-500.0);
    gallery.frame(16.0);

    let camera = gallery.camera();
    assert_approx_eq!(camera.position.z, -20.0, 1e-3);
    let knot = Point3::from_vec(gallery.scene().position_of(gallery.knot()));
    assert_aims_at(camera.position, camera.forward(), knot);
}
