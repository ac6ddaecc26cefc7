//! CPU-side mesh generation for the scene's solids.
//!
//! All meshes are generated in unit size and placed with a per-instance model
//! matrix: the sphere has radius 1, the cube has edge 1, and the arrow runs
//! from the origin to `+Z` with length 1.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Mesh vertex with a position and a unit normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.vertices.push(Vertex::new(position, normal));
        (self.vertices.len() - 1) as u32
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Axis-aligned bounds of all vertices, as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), v| {
                let p = Vec3::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Unit sphere made of `stacks` latitude bands and `slices` longitude bands.
pub fn uv_sphere(stacks: u32, slices: u32) -> Mesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut mesh = Mesh::default();

    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        for j in 0..=slices {
            let theta = TAU * j as f32 / slices as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.push(n, n);
        }
    }

    let row = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + row;
            mesh.triangle(a, a + 1, b);
            mesh.triangle(a + 1, b + 1, b);
        }
    }

    mesh
}

/// Cube with edge 1 centred on the origin, with flat per-face normals.
pub fn unit_cube() -> Mesh {
    // (normal, u, v) with u x v == normal so each face winds counter-clockwise
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = Mesh::default();
    for (n, u, v) in faces {
        let c = n * 0.5;
        let (u, v) = (u * 0.5, v * 0.5);
        let a = mesh.push(c - u - v, n);
        let b = mesh.push(c + u - v, n);
        let cc = mesh.push(c + u + v, n);
        let d = mesh.push(c - u + v, n);
        mesh.triangle(a, b, cc);
        mesh.triangle(a, cc, d);
    }
    mesh
}

/// Arrow proportions relative to its length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowShape {
    pub shaft_radius: f32,
    pub head_radius: f32,
    pub head_length: f32,
}

impl Default for ArrowShape {
    /// Shaft width a tenth of the length, head twice as wide and three times
    /// as long as the shaft is wide.
    fn default() -> Self {
        Self {
            shaft_radius: 0.05,
            head_radius: 0.1,
            head_length: 0.3,
        }
    }
}

/// Arrow of length 1 from the origin along `+Z`: a cylinder shaft and a cone head.
pub fn arrow(shape: ArrowShape, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let shaft_len = (1.0 - shape.head_length).max(0.0);
    let mut mesh = Mesh::default();

    let ring = |k: u32| {
        let t = TAU * (k % segments) as f32 / segments as f32;
        Vec3::new(t.cos(), t.sin(), 0.0)
    };

    // shaft side
    for k in 0..segments {
        let (r0, r1) = (ring(k), ring(k + 1));
        let b0 = mesh.push(r0 * shape.shaft_radius, r0);
        let b1 = mesh.push(r1 * shape.shaft_radius, r1);
        let t1 = mesh.push(r1 * shape.shaft_radius + Vec3::Z * shaft_len, r1);
        let t0 = mesh.push(r0 * shape.shaft_radius + Vec3::Z * shaft_len, r0);
        mesh.triangle(b0, b1, t1);
        mesh.triangle(b0, t1, t0);
    }

    // tail cap and the underside of the head, both facing -Z
    for (z, radius) in [(0.0, shape.shaft_radius), (shaft_len, shape.head_radius)] {
        let center = mesh.push(Vec3::Z * z, Vec3::NEG_Z);
        for k in 0..segments {
            let r0 = mesh.push(ring(k) * radius + Vec3::Z * z, Vec3::NEG_Z);
            let r1 = mesh.push(ring(k + 1) * radius + Vec3::Z * z, Vec3::NEG_Z);
            mesh.triangle(center, r1, r0);
        }
    }

    // cone
    let slope = shape.head_radius / shape.head_length.max(f32::EPSILON);
    let tip = Vec3::Z;
    for k in 0..segments {
        let (r0, r1) = (ring(k), ring(k + 1));
        let mid = (r0 + r1).normalize_or_zero();
        let a = mesh.push(r0 * shape.head_radius + Vec3::Z * shaft_len, (r0 + Vec3::Z * slope).normalize());
        let b = mesh.push(r1 * shape.head_radius + Vec3::Z * shaft_len, (r1 + Vec3::Z * slope).normalize());
        let c = mesh.push(tip, (mid + Vec3::Z * slope).normalize());
        mesh.triangle(a, b, c);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &Mesh) {
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    fn face_normal(mesh: &Mesh, tri: usize) -> Vec3 {
        let p = |k: usize| Vec3::from(mesh.vertices[mesh.indices[tri * 3 + k] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn test_sphere_points_on_unit_radius() {
        let mesh = uv_sphere(16, 24);
        assert_eq!(mesh.vertices.len(), 17 * 25);
        assert_eq!(mesh.triangle_count(), 16 * 24 * 2);
        assert_indices_in_range(&mesh);

        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn test_sphere_winds_outward() {
        let mesh = uv_sphere(8, 8);
        for tri in 0..mesh.triangle_count() {
            let n = face_normal(&mesh, tri);
            // degenerate triangles at the poles have no area
            if n.length() < 1e-6 {
                continue;
            }
            let centroid = Vec3::from(mesh.vertices[mesh.indices[tri * 3] as usize].position);
            assert!(n.dot(centroid) > 0.0, "triangle {} winds inward", tri);
        }
    }

    #[test]
    fn test_cube_bounds_and_winding() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_indices_in_range(&mesh);

        let (lo, hi) = mesh.bounds();
        assert_eq!(lo, Vec3::splat(-0.5));
        assert_eq!(hi, Vec3::splat(0.5));

        for tri in 0..mesh.triangle_count() {
            let stored = Vec3::from(mesh.vertices[mesh.indices[tri * 3] as usize].normal);
            assert!(face_normal(&mesh, tri).dot(stored) > 0.0);
        }
    }

    #[test]
    fn test_arrow_spans_unit_length() {
        let shape = ArrowShape::default();
        let mesh = arrow(shape, 12);
        assert_indices_in_range(&mesh);

        let (lo, hi) = mesh.bounds();
        assert!(lo.z.abs() < 1e-6);
        assert!((hi.z - 1.0).abs() < 1e-6);
        assert!(hi.x <= shape.head_radius + 1e-6);
        assert!(lo.y >= -shape.head_radius - 1e-6);
    }

    #[test]
    fn test_arrow_normals_are_unit() {
        let mesh = arrow(ArrowShape::default(), 8);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }
}
