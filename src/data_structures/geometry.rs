//! Procedural geometry generation.
//!
//! Everything drawn in the gallery is generated here rather than loaded from
//! model files: axis-aligned boxes for the room and the paintings, the torus
//! knot centrepiece and the line lists used by the debug helpers. The output
//! is plain CPU data; [`crate::resources::mesh`] uploads it to the GPU.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::ModelVertex;

/// Indexed triangle list ready for upload.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A coloured vertex of a helper line list.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Face table of a box: outward normal, then the two in-plane axes.
///
/// `u × v == normal` for every entry so that the corners emitted below wind
/// counter-clockwise when seen from outside.
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// A box centred on the origin, four vertices per face so that every face
/// gets its own normal and a full 0..1 texture mapping.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
    let scale = |axis: [f32; 3]| -> Vector3<f32> {
        Vector3::new(axis[0] * half.x, axis[1] * half.y, axis[2] * half.z)
    };

    let mut geometry = Geometry::default();
    for (normal, u, v) in BOX_FACES {
        let base = geometry.vertices.len() as u32;
        let (n, u_axis, v_axis) = (scale(normal), scale(u), scale(v));
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = n + u_axis * su + v_axis * sv;
            geometry.vertices.push(ModelVertex {
                position: position.into(),
                // wgpu samples with the origin in the top-left corner
                tex_coords: [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
                normal,
            });
        }
        geometry
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    geometry
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vector3<f32> {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vector3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// A (p, q) torus knot: a tube of radius `tube` swept along a closed curve
/// wound `p` times around the axis of rotational symmetry and `q` times
/// around the interior circle.
///
/// The sweep produces `(tubular_segments + 1) * (radial_segments + 1)` vertices;
/// the seam vertices are duplicated so the texture wraps cleanly.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let (p, q) = (p as f32, q as f32);
    let mut geometry = Geometry::default();

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p * TAU;
        let p1 = knot_curve(u, p, q, radius);
        let p2 = knot_curve(u + 0.01, p, q, radius);

        // Frenet-like frame from two nearby samples of the curve
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            geometry.vertices.push(ModelVertex {
                position: position.into(),
                tex_coords: [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
                normal: (position - p1).normalize().into(),
            });
        }
    }

    let stride = radial_segments + 1;
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    geometry
}

/// Square grid on the XZ plane; the two centre lines get `center_color`.
pub fn grid_lines(size: f32, divisions: u32, center_color: [f32; 3], color: [f32; 3]) -> Vec<LineVertex> {
    let step = size / divisions as f32;
    let half = size / 2.0;
    let center = divisions / 2;

    let mut lines = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == center { center_color } else { color };
        lines.push(LineVertex { position: [-half, 0.0, k], color });
        lines.push(LineVertex { position: [half, 0.0, k], color });
        lines.push(LineVertex { position: [k, 0.0, -half], color });
        lines.push(LineVertex { position: [k, 0.0, half], color });
    }
    lines
}

/// Red, green and blue segments along +X, +Y and +Z.
pub fn axes_lines(size: f32) -> Vec<LineVertex> {
    let mut lines = Vec::with_capacity(6);
    for axis in 0..3 {
        let mut end = [0.0; 3];
        end[axis] = size;
        let mut color = [0.0; 3];
        color[axis] = 1.0;
        lines.push(LineVertex { position: [0.0; 3], color });
        lines.push(LineVertex { position: end, color });
    }
    lines
}

/// Outline of a `width` × `height` rectangle centred on `center` and facing
/// along `normal`, plus a short stub showing the emission direction.
pub fn rect_outline(
    center: Vector3<f32>,
    normal: Vector3<f32>,
    width: f32,
    height: f32,
    color: [f32; 3],
) -> Vec<LineVertex> {
    let normal = normal.normalize();
    let right = Vector3::unit_y().cross(normal).normalize() * (width / 2.0);
    let up = normal.cross(right).normalize() * (height / 2.0);
    let corners = [
        center - right - up,
        center + right - up,
        center + right + up,
        center - right + up,
    ];

    let mut lines = Vec::with_capacity(10);
    for k in 0..corners.len() {
        let (from, to) = (corners[k], corners[(k + 1) % corners.len()]);
        lines.push(LineVertex { position: from.into(), color });
        lines.push(LineVertex { position: to.into(), color });
    }
    lines.push(LineVertex { position: center.into(), color });
    lines.push(LineVertex { position: (center + normal).into(), color });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(geometry: &Geometry, tri: &[u32]) -> Vector3<f32> {
        let p = |i: u32| Vector3::from(geometry.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn cuboid_has_24_vertices_and_12_triangles() {
        let geometry = cuboid(20.0, 0.1, 65.0);
        assert_eq!(geometry.vertices.len(), 24);
        assert_eq!(geometry.triangle_count(), 12);
    }

    #[test]
    fn cuboid_winds_counter_clockwise_from_outside() {
        let geometry = cuboid(0.1, 8.0, 8.0);
        for tri in geometry.indices.chunks(3) {
            let expected = Vector3::from(geometry.vertices[tri[0] as usize].normal);
            assert!(face_normal(&geometry, tri).dot(expected) > 0.0);
        }
    }

    #[test]
    fn cuboid_spans_its_extents() {
        let geometry = cuboid(1.0, 12.0, 65.0);
        let max = geometry.vertices.iter().fold([f32::MIN; 3], |acc, v| {
            [acc[0].max(v.position[0]), acc[1].max(v.position[1]), acc[2].max(v.position[2])]
        });
        assert_eq!(max, [0.5, 6.0, 32.5]);
    }

    #[test]
    fn torus_knot_counts_follow_segments() {
        let geometry = torus_knot(1.5, 0.5, 200, 16, 2, 3);
        assert_eq!(geometry.vertices.len(), 201 * 17);
        assert_eq!(geometry.triangle_count(), 200 * 16 * 2);
        let max_index = *geometry.indices.iter().max().unwrap();
        assert!((max_index as usize) < geometry.vertices.len());
    }

    #[test]
    fn torus_knot_stays_within_its_bounds() {
        let geometry = torus_knot(1.5, 0.5, 64, 8, 2, 3);
        // the curve never leaves radius * 1.5; the tube adds at most `tube`
        for vertex in &geometry.vertices {
            assert!(Vector3::from(vertex.position).magnitude() <= 1.5 * 1.5 + 0.5 + 1e-4);
            assert!((Vector3::from(vertex.normal).magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn grid_marks_centre_lines() {
        let lines = grid_lines(200.0, 50, [1.0; 3], [0.5; 3]);
        assert_eq!(lines.len(), 51 * 4);
        let centre: Vec<_> = lines.iter().filter(|l| l.color == [1.0; 3]).collect();
        assert_eq!(centre.len(), 4);
        assert!(centre.iter().all(|l| l.position.contains(&0.0)));
    }

    #[test]
    fn rect_outline_faces_its_normal() {
        let lines = rect_outline(Vector3::new(0.0, 5.0, 5.0), -Vector3::unit_z(), 4.0, 10.0, [1.0, 0.0, 0.0]);
        assert_eq!(lines.len(), 10);
        let ys: Vec<f32> = lines[..8].iter().map(|l| l.position[1]).collect();
        assert!(ys.iter().all(|y| (*y - 0.0).abs() < 1e-5 || (*y - 10.0).abs() < 1e-5));
        assert_eq!(lines[9].position, [0.0, 5.0, 4.0]);
    }
}
