//! Geometry primitives for the viewer scene

use nalgebra::{Point3, Vector2, Vector3};

/// Default albedo for geometry without a material
pub const DEFAULT_ALBEDO: [f32; 3] = [0.8, 0.8, 0.8];

/// Upper bound on plane cells per side
pub const MAX_PLANE_SUBDIVISIONS: u32 = 128;

/// A 3D vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
            uv: Vector2::zeros(),
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = Vector2::new(u, v);
        self
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order, `None` for a zero-area triangle
    pub fn face_normal(&self) -> Option<Vector3<f32>> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0)).try_normalize(f32::EPSILON)
    }
}

/// A 3D mesh composed of triangles sharing one albedo
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub albedo: [f32; 3],
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            albedo: DEFAULT_ALBEDO,
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Iterate over every vertex position in the mesh
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f32>> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| &v.position))
    }

    /// Build a mesh from flat triangulated position/index buffers.
    ///
    /// Normals are taken from the faces; degenerate faces are dropped.
    pub fn from_indexed(positions: &[f32], indices: &[u32]) -> Self {
        let point = |i: u32| -> Option<Point3<f32>> {
            let i = i as usize * 3;
            positions
                .get(i..i + 3)
                .map(|p| Point3::new(p[0], p[1], p[2]))
        };

        let mut mesh = Self::with_capacity(indices.len() / 3);
        for face in indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (point(face[0]), point(face[1]), point(face[2]))
            else {
                continue;
            };
            let Some(n) = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON) else {
                continue;
            };
            let vertex = |p: Point3<f32>| Vertex::new(p.x, p.y, p.z, n.x, n.y, n.z);
            mesh.add_triangle(Triangle::new(vertex(a), vertex(b), vertex(c)));
        }
        mesh
    }

    /// A square plane in the XZ plane centered at the origin, facing +Y.
    ///
    /// The plane is split into `subdivisions` x `subdivisions` cells so that
    /// cells in front of the camera still rasterize when others are clipped.
    /// Texture coordinates span [0, 1] across the whole plane. The cell
    /// count per side is clamped to `1..=MAX_PLANE_SUBDIVISIONS`.
    pub fn plane(size: f32, subdivisions: u32) -> Self {
        let cells = subdivisions.clamp(1, MAX_PLANE_SUBDIVISIONS);
        let step = size / cells as f32;
        let half = size / 2.0;
        let per_side = cells as usize;
        let mut mesh = Self::with_capacity(per_side * per_side * 2);

        let vertex = |i: u32, j: u32| {
            let u = i as f32 / cells as f32;
            let v = j as f32 / cells as f32;
            Vertex::new(-half + i as f32 * step, 0.0, half - j as f32 * step, 0.0, 1.0, 0.0)
                .with_uv(u, v)
        };

        for j in 0..cells {
            for i in 0..cells {
                let v00 = vertex(i, j);
                let v10 = vertex(i + 1, j);
                let v11 = vertex(i + 1, j + 1);
                let v01 = vertex(i, j + 1);
                mesh.add_triangle(Triangle::new(v00, v10, v11));
                mesh.add_triangle(Triangle::new(v00, v11, v01));
            }
        }

        mesh
    }

    /// Create a simple cube mesh, used when no model is configured
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, two in-plane axes) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ];

        for (n, a, b) in faces {
            let n = Vector3::from(n);
            let a = Vector3::from(a);
            let b = Vector3::from(b);
            let corner = |sa: f32, sb: f32| {
                let p = (n + a * sa + b * sb) * half;
                Vertex::new(p.x, p.y, p.z, n.x, n.y, n.z)
            };
            mesh.add_triangle(Triangle::new(
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
            ));
            mesh.add_triangle(Triangle::new(
                corner(-1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
