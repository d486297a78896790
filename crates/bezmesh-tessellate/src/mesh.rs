//! Mesh types produced by the tessellators.

use std::collections::HashMap;

use bezmesh_math::{midpoint3, Point3, Vec3};
use bezmesh_patch::SurfaceSample;

/// A triangle that owns copies of its three samples.
///
/// Vertex order is the winding; tessellators preserve it through every
/// subdivision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// The three corners in winding order.
    pub vertices: [SurfaceSample; 3],
}

impl Triangle {
    /// Create a triangle from three samples in winding order.
    pub fn new(a: SurfaceSample, b: SurfaceSample, c: SurfaceSample) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Corner positions in winding order.
    pub fn positions(&self) -> [Point3; 3] {
        self.vertices.map(|s| s.position)
    }

    /// Unnormalized geometric normal `(b - a) × (c - a)`.
    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.positions();
        (b - a).cross(&(c - a))
    }

    /// Sum of the corner sample normals.
    pub fn sample_normal_sum(&self) -> Vec3 {
        self.vertices.iter().map(|s| s.normal).sum()
    }
}

/// Triangles and samples produced for one patch.
///
/// `samples` lists every evaluated point in the order it was produced;
/// `triangles` embed their own copies and do not index into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Evaluated surface samples.
    pub samples: Vec<SurfaceSample>,
    /// Output triangles.
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of samples.
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples whose normal could not be computed.
    pub fn degenerate_sample_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_degenerate()).count()
    }

    /// Axis-aligned bounds of the sample positions.
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_points(self.samples.iter().map(|s| s.position))
    }
}

/// Concatenate the triangles of every mesh in order.
///
/// No vertices are shared: each triangle keeps its own three samples.
pub fn aggregate_triangles(meshes: &[Mesh]) -> Vec<Triangle> {
    let total = meshes.iter().map(Mesh::num_triangles).sum();
    let mut triangles = Vec::with_capacity(total);
    for mesh in meshes {
        triangles.extend_from_slice(&mesh.triangles);
    }
    triangles
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl MeshBounds {
    /// Bounds of a set of points, or `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(&p);
        }
        Some(bounds)
    }

    /// Bounds over every sample of every mesh.
    pub fn from_meshes(meshes: &[Mesh]) -> Option<Self> {
        Self::from_points(
            meshes
                .iter()
                .flat_map(|m| m.samples.iter().map(|s| s.position)),
        )
    }

    /// Grow to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        midpoint3(&self.min, &self.max)
    }

    /// Edge lengths along x, y and z.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Longest edge length.
    pub fn largest_extent(&self) -> f64 {
        self.extent().max()
    }
}

/// Shared-vertex triangle mesh for rendering and export.
///
/// Vertices are keyed by `(patch, u, v)`, so samples evaluated at the same
/// parameter within one patch become one vertex carrying its analytic
/// normal. Patches never share vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Index one patch's mesh, merging samples with identical `(u, v)`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut out = Self::new();
        let mut index_of: HashMap<(u64, u64), u32> = HashMap::new();

        for tri in &mesh.triangles {
            for sample in &tri.vertices {
                let key = (sample.uv.x.to_bits(), sample.uv.y.to_bits());
                let idx = *index_of.entry(key).or_insert_with(|| {
                    let idx = out.num_vertices() as u32;
                    out.push_vertex(sample);
                    idx
                });
                out.indices.push(idx);
            }
        }

        out
    }

    /// Index every patch's mesh and merge them in order.
    pub fn from_meshes(meshes: &[Mesh]) -> Self {
        let mut out = Self::new();
        for mesh in meshes {
            out.merge(&Self::from_mesh(mesh));
        }
        out
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    fn push_vertex(&mut self, sample: &SurfaceSample) {
        let p = sample.position;
        let n = sample.normal;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        self.normals
            .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
    }
}
