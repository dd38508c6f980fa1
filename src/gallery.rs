//! The gallery application context.
//!
//! [`Gallery`] owns everything the frame callback, the scroll handler and the
//! resize handler mutate: the scene, the camera and projection, the camera rig
//! and the viewport. It has no GPU state, the `flow` module pairs it with a
//! [`Context`](crate::context::Context) once a window exists.

use cgmath::{Deg, EuclideanSpace, Point3, Quaternion, Rad, Rotation3};
use winit::event::WindowEvent;

use crate::{
    builder,
    camera::{Camera, Projection},
    config::GalleryConfig,
    data_structures::scene_graph::{NodeId, Scene},
    rig::{self, CameraRig, OrbitRig, SwayRig},
    scroll,
    stats::{FrameStats, StatsSample},
};

pub const FOVY: Deg<f32> = Deg(45.0);
pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 1000.0;

pub struct Gallery {
    config: GalleryConfig,
    scene: Scene,
    knot: NodeId,
    /// Unwrapped rotation of the knot about +y. The instance quaternion is
    /// derived from it.
    knot_angle: Rad<f32>,
    paintings: Vec<NodeId>,
    camera: Camera,
    projection: Projection,
    rig: Box<dyn CameraRig>,
    viewport: (u32, u32),
    stats: Option<FrameStats>,
}

impl Gallery {
    /// Builds the scene and aims the camera at the knot from the hall entrance.
    pub fn new(config: GalleryConfig, width: u32, height: u32) -> Self {
        let built = builder::build(&config);
        let target = Point3::from_vec(builder::knot_position());

        let mut camera = Camera::new((0.0, 5.0, scroll::scroll_depth(0.0)), Deg(90.0), Deg(0.0));
        camera.look_at(target);

        let rig: Box<dyn CameraRig> = if config.debug {
            Box::new(OrbitRig::new(&camera, target))
        } else {
            Box::new(SwayRig)
        };
        log::info!("Gallery camera rig: {}", rig.name());

        let stats = config.debug.then(FrameStats::new);

        Self {
            projection: Projection::new(width, height, FOVY, ZNEAR, ZFAR),
            viewport: (width, height),
            scene: built.scene,
            knot: built.knot,
            knot_angle: Rad(0.0),
            paintings: built.paintings,
            camera,
            rig,
            stats,
            config,
        }
    }

    /// Advances the animation to `time_ms` since the loop started.
    ///
    /// In debug mode returns the frame statistics whenever a sampling window
    /// closes.
    pub fn frame(&mut self, time_ms: f64) -> Option<StatsSample> {
        self.knot_angle = rig::knot_angle(time_ms);
        let rotation = Quaternion::from_angle_y(self.knot_angle);
        for instance in &mut self.scene.node_mut(self.knot).instances {
            instance.rotation = rotation;
        }
        self.rig.frame(&mut self.camera, time_ms);
        self.stats.as_mut().and_then(|stats| stats.record(time_ms))
    }

    /// Moves the camera to the depth matching the body's top offset.
    pub fn scroll(&mut self, top: f64) {
        self.camera.position.z = scroll::scroll_depth(top);
    }

    /// Returns `false` for zero-sized viewports, which are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.projection.resize(width, height);
        self.viewport = (width, height);
        true
    }

    /// Offers a window event to the camera rig.
    pub fn window_event(&mut self, event: &WindowEvent) -> bool {
        self.rig.window_event(event)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn knot(&self) -> NodeId {
        self.knot
    }

    /// Angle the knot was last turned to, never wrapped.
    pub fn knot_angle(&self) -> Rad<f32> {
        self.knot_angle
    }

    /// Rotation currently applied to the knot.
    pub fn knot_rotation(&self) -> Quaternion<f32> {
        self.scene
            .node(self.knot)
            .instances
            .first()
            .map_or(Quaternion::new(1.0, 0.0, 0.0, 0.0), |instance| instance.rotation)
    }

    pub fn paintings(&self) -> &[NodeId] {
        &self.paintings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn rig_name(&self) -> &'static str {
        self.rig.name()
    }

    pub fn is_debug(&self) -> bool {
        self.config.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn startup_camera_faces_the_knot() {
        let gallery = Gallery::new(GalleryConfig::default().with_debug(false), 800, 600);
        let camera = gallery.camera();
        assert_eq!(camera.position, Point3::new(0.0, 5.0, -15.0));
        assert!((camera.forward() - Vector3::unit_z()).magnitude() < 1e-5);
        assert_eq!(gallery.rig_name(), "sway");
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut gallery = Gallery::new(GalleryConfig::default().with_debug(false), 800, 600);
        assert!(!gallery.resize(0, 600));
        assert_eq!(gallery.viewport(), (800, 600));
        assert_eq!(gallery.projection().aspect(), 800.0 / 600.0);
    }

    #[test]
    fn frame_only_reports_stats_in_debug() {
        let mut gallery = Gallery::new(GalleryConfig::default().with_debug(false), 800, 600);
        assert!((0..200).all(|frame| gallery.frame(frame as f64 * 16.0).is_none()));

        let mut debug = Gallery::new(GalleryConfig::default().with_debug(true), 800, 600);
        assert!((0..200).any(|frame| debug.frame(frame as f64 * 16.0).is_some()));
    }
}
