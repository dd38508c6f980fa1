//! Camera rigs.
//!
//! A rig moves the camera once per frame. The shipped gallery uses
//! [`SwayRig`], which swings the camera sideways as a pure function of elapsed
//! time; debug builds use [`OrbitRig`], which lets the mouse orbit the camera
//! around the torus knot. The rig is picked when the
//! [`Gallery`](crate::gallery::Gallery) is constructed and never swapped.

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{InnerSpace, Point3, Rad, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::camera::Camera;

/// Rotation of the knot about +y after `time_ms` milliseconds.
///
/// The raw quotient is kept; angles past 2π are not wrapped.
pub fn knot_angle(time_ms: f64) -> Rad<f32> {
    Rad((time_ms / 1000.0) as f32)
}

/// Horizontal camera offset after `time_ms` milliseconds: amplitude 1,
/// period 2π seconds.
pub fn sway_offset(time_ms: f64) -> f32 {
    (time_ms / 1000.0).sin() as f32
}

pub trait CameraRig: Send {
    /// Moves `camera` for the frame at `time_ms` since the loop started.
    fn frame(&mut self, camera: &mut Camera, time_ms: f64);

    /// Offers a window event to the rig. Returns `true` when it was consumed.
    fn window_event(&mut self, _event: &WindowEvent) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

/// Sideways oscillation used by the shipped gallery.
#[derive(Debug, Default)]
pub struct SwayRig;

impl CameraRig for SwayRig {
    fn frame(&mut self, camera: &mut Camera, time_ms: f64) {
        camera.position.x = sway_offset(time_ms);
    }

    fn name(&self) -> &'static str {
        "sway"
    }
}

/// Keeps the polar angle away from the poles so the view never flips.
const POLAR_EPSILON: f32 = 1e-3;
const MIN_RADIUS: f32 = 0.1;

/// Mouse-driven orbit around a fixed target.
///
/// Dragging with the left button rotates, the wheel dollies in and out.
/// When something else moved the camera since the last frame (scrolling does),
/// the orbit is re-derived from the camera's new position first.
#[derive(Debug)]
pub struct OrbitRig {
    target: Point3<f32>,
    radius: f32,
    /// Angle around +y measured from +z.
    azimuth: f32,
    /// Angle from +y.
    polar: f32,
    rotate_speed: f32,
    zoom_scale: f32,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    /// Where the rig last put the camera.
    placed: Option<Point3<f32>>,
}

impl OrbitRig {
    /// Starts orbiting `target` from wherever `camera` currently is.
    pub fn new(camera: &Camera, target: Point3<f32>) -> Self {
        let mut rig = Self {
            target,
            radius: MIN_RADIUS,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            rotate_speed: 0.005,
            zoom_scale: 0.95,
            dragging: false,
            last_cursor: None,
            placed: None,
        };
        rig.follow(camera.position);
        rig
    }

    /// Re-derives radius and angles so the orbit passes through `position`.
    fn follow(&mut self, position: Point3<f32>) {
        let offset = position - self.target;
        self.radius = offset.magnitude().max(MIN_RADIUS);
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = (offset.y / self.radius)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Rotates by a cursor movement of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.azimuth -= dx as f32 * self.rotate_speed;
        self.polar = (self.polar - dy as f32 * self.rotate_speed).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Positive steps move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.radius = (self.radius * self.zoom_scale.powf(steps)).max(MIN_RADIUS);
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + Vector3::new(
                self.radius * sin_polar * sin_azimuth,
                self.radius * cos_polar,
                self.radius * sin_polar * cos_azimuth,
            )
    }
}

impl CameraRig for OrbitRig {
    fn frame(&mut self, camera: &mut Camera, _time_ms: f64) {
        if self.placed.is_some_and(|placed| placed != camera.position) {
            self.follow(camera.position);
        }
        camera.position = self.position();
        camera.look_at(self.target);
        self.placed = Some(camera.position);
    }

    fn window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.rotate(position.x - last.x, position.y - last.y);
                }
                self.last_cursor = Some(*position);
                self.dragging
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 100.0,
                };
                self.zoom(steps);
                true
            }
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        "orbit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_camera() -> Camera {
        let mut camera = Camera::new((0.0, 5.0, -15.0), Rad(0.0), Rad(0.0));
        camera.look_at(Point3::new(0.0, 5.0, 0.0));
        camera
    }

    #[test]
    fn knot_angle_is_not_wrapped() {
        assert_eq!(knot_angle(0.0), Rad(0.0));
        assert_eq!(knot_angle(1500.0), Rad(1.5));
        assert_eq!(knot_angle(100_000.0), Rad(100.0));
    }

    #[test]
    fn sway_rig_only_touches_x() {
        let mut camera = start_camera();
        let before = camera.clone();
        SwayRig.frame(&mut camera, 2000.0);
        assert_eq!(camera.position.x, (2.0f64).sin() as f32);
        assert_eq!(camera.position.y, before.position.y);
        assert_eq!(camera.position.z, before.position.z);
        assert_eq!(camera.yaw, before.yaw);
    }

    #[test]
    fn orbit_starts_where_the_camera_is() {
        let mut camera = start_camera();
        let mut rig = OrbitRig::new(&camera, Point3::new(0.0, 5.0, 0.0));
        rig.frame(&mut camera, 0.0);
        assert!((camera.position - Point3::new(0.0, 5.0, -15.0)).magnitude() < 1e-4);
        assert!((camera.forward() - Vector3::unit_z()).magnitude() < 1e-4);
    }

    #[test]
    fn orbit_keeps_aiming_at_target() {
        let mut camera = start_camera();
        let target = Point3::new(0.0, 5.0, 0.0);
        let mut rig = OrbitRig::new(&camera, target);
        rig.rotate(120.0, -40.0);
        rig.frame(&mut camera, 16.0);
        let expected = (target - camera.position).normalize();
        assert!((camera.forward() - expected).magnitude() < 1e-4);
        assert!(((camera.position - target).magnitude() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_follows_external_moves() {
        let mut camera = start_camera();
        let target = Point3::new(0.0, 5.0, 0.0);
        let mut rig = OrbitRig::new(&camera, target);
        rig.frame(&mut camera, 0.0);

        camera.position.z = -25.0;
        rig.frame(&mut camera, 16.0);
        assert!((camera.position - Point3::new(0.0, 5.0, -25.0)).magnitude() < 1e-3);
        assert!((rig.radius() - 25.0).abs() < 1e-3);

        // untouched frames keep mouse rotation
        rig.rotate(60.0, 0.0);
        rig.frame(&mut camera, 32.0);
        assert!(camera.position.x.abs() > 1.0);
        assert!(((camera.position - target).magnitude() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_clamps_polar_angle() {
        let camera = start_camera();
        let mut rig = OrbitRig::new(&camera, Point3::new(0.0, 5.0, 0.0));
        rig.rotate(0.0, 1e6);
        assert!(rig.polar() >= POLAR_EPSILON);
        rig.rotate(0.0, -1e6);
        assert!(rig.polar() <= PI - POLAR_EPSILON);
    }

    #[test]
    fn orbit_zoom_never_reaches_target() {
        let camera = start_camera();
        let mut rig = OrbitRig::new(&camera, Point3::new(0.0, 5.0, 0.0));
        rig.zoom(1.0);
        assert!(rig.radius() < 15.0);
        rig.zoom(1e4);
        assert_eq!(rig.radius(), MIN_RADIUS);
    }
}
