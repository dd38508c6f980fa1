use cgmath::{InnerSpace, Point3, Vector3};
use hallway_gallery::{Gallery, GalleryConfig};

pub const WIDTH: u32 = 1280;
pub const HEIGHT: u32 = 720;

/// The gallery as shipped: sway rig, no helpers.
pub fn shipped_gallery() -> Gallery {
    Gallery::new(GalleryConfig::default().with_debug(false), WIDTH, HEIGHT)
}

pub fn debug_gallery() -> Gallery {
    Gallery::new(GalleryConfig::default().with_debug(true), WIDTH, HEIGHT)
}

/// Asserts that `forward` points from `from` towards `target`.
pub fn assert_aims_at(from: Point3<f32>, forward: Vector3<f32>, target: Point3<f32>) {
    let expected = (target - from).normalize();
    let error = (forward - expected).magnitude();
    assert!(
        error < 1e-4,
        "camera at {from:?} looks along {forward:?}, expected {expected:?}"
    );
}
