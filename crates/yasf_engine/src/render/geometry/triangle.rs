//! Single flat triangle

use crate::foundation::math::Vec3;
use crate::render::primitives::{Mesh, Vertex};

/// UVs assigned to the three corners
const TRIANGLE_UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]];

/// Triangle through three explicit points, counter-clockwise front face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleGeometry {
    /// Corners in declaration order
    pub corners: [Vec3; 3],
}

impl TriangleGeometry {
    /// Flat face normal, zero for a degenerate triangle
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.corners;
        (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Build the mesh
    pub fn build(&self) -> Mesh {
        let normal: [f32; 3] = self.normal().into();
        let vertices = self
            .corners
            .iter()
            .zip(TRIANGLE_UVS)
            .map(|(corner, uv)| Vertex::new((*corner).into(), normal, uv))
            .collect();

        Mesh::new(vertices, vec![0, 1, 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_uvs_and_normal() {
        let mesh = TriangleGeometry {
            corners: [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        }
        .build();

        assert_eq!(mesh.vertices[0].tex_coord, [0.0, 0.0]);
        assert_eq!(mesh.vertices[1].tex_coord, [1.0, 0.0]);
        assert_eq!(mesh.vertices[2].tex_coord, [0.5, 1.0]);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let geometry = TriangleGeometry { corners: [Vec3::zeros(); 3] };
        assert_eq!(geometry.normal(), Vec3::zeros());
    }
}
