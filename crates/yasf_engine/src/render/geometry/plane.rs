//! Flat rectangle in the XY plane

use crate::render::primitives::{Mesh, Vertex};

/// Rectangle of `width` × `height` facing +Z, subdivided into a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGeometry {
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub height: f32,
    /// Columns
    pub width_segments: u32,
    /// Rows
    pub height_segments: u32,
}

impl PlaneGeometry {
    /// Build the mesh
    pub fn build(&self) -> Mesh {
        let grid_x = self.width_segments.max(1);
        let grid_y = self.height_segments.max(1);
        let grid_x1 = grid_x + 1;
        let segment_width = self.width / grid_x as f32;
        let segment_height = self.height / grid_y as f32;
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        let mut vertices = Vec::with_capacity(((grid_x + 1) * (grid_y + 1)) as usize);
        for iy in 0..=grid_y {
            let y = (iy as f32).mul_add(segment_height, -half_height);
            for ix in 0..=grid_x {
                let x = (ix as f32).mul_add(segment_width, -half_width);
                vertices.push(Vertex::new(
                    [x, -y, 0.0],
                    [0.0, 0.0, 1.0],
                    [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                ));
            }
        }

        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Mesh::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_plane_counts_and_extent() {
        let mesh = PlaneGeometry { width: 2.0, height: 4.0, width_segments: 2, height_segments: 4 }.build();
        assert_eq!(mesh.vertices.len(), 3 * 5);
        assert_eq!(mesh.triangle_count(), 2 * 4 * 2);

        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_plane_winding_faces_normal() {
        let mut mesh = PlaneGeometry { width: 1.0, height: 1.0, width_segments: 1, height_segments: 1 }.build();
        let declared: Vec<_> = mesh.vertices.iter().map(|v| v.normal).collect();
        mesh.compute_vertex_normals();
        let computed: Vec<_> = mesh.vertices.iter().map(|v| v.normal).collect();
        assert_eq!(declared, computed);
    }
}
