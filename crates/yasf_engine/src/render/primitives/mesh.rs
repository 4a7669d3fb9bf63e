//! Mesh representation for compiled primitives
//!
//! Pure geometry containers with no backend dependencies: an interleaved
//! vertex list, triangle indices and an optional per-vertex color stream.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec3;
use crate::scene::AABB;

/// 3D vertex data structure for rendering
///
/// `#[repr(C)]` keeps the layout stable for GPU buffer uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// 3D mesh containing vertices and indices for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,

    /// Per-vertex colors; empty unless the geometry is vertex colored
    pub colors: Vec<[f32; 3]>,
}

impl Mesh {
    /// Create a new mesh
    pub const fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            colors: Vec::new(),
        }
    }

    /// Attach a per-vertex color stream
    pub fn with_colors(mut self, colors: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(colors.len(), self.vertices.len());
        self.colors = colors;
        self
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if the mesh carries vertex colors
    pub fn has_vertex_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Bounding box of the vertex positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<AABB> {
        let first = self.vertices.first()?;
        let start = Vec3::from(first.position);
        let (min, max) = self.vertices.iter().fold((start, start), |(min, max), vertex| {
            let p = Vec3::from(vertex.position);
            (min.inf(&p), max.sup(&p))
        });
        Some(AABB::new(min, max))
    }

    /// Recompute smooth normals by accumulating area-weighted face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vec3::zeros(); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face_normal = (pb - pa).cross(&(pc - pa));
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
            vertex.normal = normal.into();
        }
    }

    /// Turn the mesh inside out: reverse winding and negate normals
    pub fn flip_faces(&mut self) {
        for triangle in self.indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
        for vertex in &mut self.vertices {
            vertex.normal = vertex.normal.map(|n| -n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [1.0, 0.0]),
                Vertex::new([1.0, 1.0, 0.0], [0.0; 3], [1.0, 1.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0, 1.0]),
            ],
            vec![0, 1, 2, 2, 3, 0],
        )
    }

    #[test]
    fn test_compute_vertex_normals_ccw_faces_up_z() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_flip_faces_inverts_normals_and_winding() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        mesh.flip_faces();
        assert_eq!(mesh.indices[..3], [0, 2, 1]);
        assert_eq!(mesh.vertices[0].normal, [-0.0, -0.0, -1.0]);
    }

    #[test]
    fn test_bounds() {
        let bounds = quad().bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_vertex_is_pod() {
        let vertices = [Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5])];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 8 * 4);
    }
}
